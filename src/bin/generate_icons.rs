use skip_icons::icons::{default_output_dir, run};

fn main() -> anyhow::Result<()> {
    let verbose = std::env::args().nth(1).is_some_and(|arg| arg == "-v");
    let verbosity = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .parse_default_env()
        .init();

    run(&default_output_dir(), &mut std::io::stdout().lock())
}
