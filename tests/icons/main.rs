use std::fs;

use miniz_oxide::inflate::decompress_to_vec_zlib;
use tempfile::tempdir;
use skip_icons::{
    chunks::{iter_chunks, Chunk},
    decoder::SIGNATURE,
    generate_icons,
    icons::{encode_icon, icon_file_name},
    render_icon, Pixel, ICON_SIZES, PNG,
};

const IEND: [u8; 12] = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xae, 0x42, 0x60, 0x82];

#[test]
fn stream_is_framed() {
    for size in ICON_SIZES {
        let bytes = encode_icon(size);
        assert_eq!(&bytes[..8], SIGNATURE);
        assert_eq!(bytes[bytes.len() - 12..], IEND);

        let chunks: Vec<_> = iter_chunks(&bytes[8..])
            .collect::<anyhow::Result<_>>()
            .unwrap();
        let types: Vec<_> = chunks.iter().map(|chunk| chunk.chunk_type()).collect();
        assert_eq!(types, [b"IHDR", b"IDAT", b"IEND"]);
    }
}

#[test]
fn header_describes_rgba8() {
    for size in ICON_SIZES {
        let bytes = encode_icon(size);
        let Some(Ok(Chunk::IHDR(header))) = iter_chunks(&bytes[8..]).next() else {
            panic!("first chunk should be IHDR");
        };
        assert_eq!((header.width, header.height), (size, size));
        assert_eq!(header.bit_depth, 8);
        assert_eq!(header.color_type as u8, 6);
        assert_eq!(header.compression_method, 0);
        assert_eq!(header.filter_method, 0);
        assert_eq!(header.interlace_method as u8, 0);
    }
}

#[test]
fn scanlines_are_unfiltered() {
    for size in ICON_SIZES {
        let bytes = encode_icon(size);
        let idat = iter_chunks(&bytes[8..])
            .find_map(|chunk| match chunk {
                Ok(Chunk::IDAT(idat)) => Some(idat.data.to_vec()),
                _ => None,
            })
            .unwrap();
        let raw = decompress_to_vec_zlib(&idat).unwrap();
        let stride = 1 + 4 * size as usize;
        assert_eq!(raw.len(), size as usize * stride);
        assert!(raw.iter().step_by(stride).all(|&filter| filter == 0));
    }
}

#[test]
fn standard_decoder_round_trip() {
    for size in ICON_SIZES {
        let bytes = encode_icon(size);
        let decoder = png::Decoder::new(bytes.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());

        assert_eq!((info.width, info.height), (size, size));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(buf, render_icon(size).into_bytes());
    }
}

#[test]
fn own_decoder_round_trip() {
    for size in ICON_SIZES {
        let image = PNG::decode(&encode_icon(size)).unwrap();
        assert_eq!(image.into_pixels(), render_icon(size));
    }
}

#[test]
fn writes_icon_set() {
    let dir = tempdir().unwrap();

    let written = generate_icons(dir.path()).unwrap();
    assert_eq!(written.len(), 3);
    let mut on_disk: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    on_disk.sort();
    assert_eq!(on_disk, ["icon128.png", "icon16.png", "icon48.png"]);

    for (path, size) in written.iter().zip(ICON_SIZES) {
        assert!(path.ends_with(icon_file_name(size)));
        let image = PNG::decode(&fs::read(path).unwrap()).unwrap();
        assert_eq!((image.width(), image.height()), (size, size));
        let last = size - 1;
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            assert_eq!(image.pixel(x, y), Some(Pixel::BACKGROUND));
        }
    }
}
