//! Session lifecycle tests: the original stays immutable while
//! parameter changes re-derive transient outputs, ending in an encoded
//! preview.

mod common;

use docscan::encode::OutputFormat;
use docscan::processing::FilterMode;
use docscan::session::ScanSession;
use docscan::source::{BitmapSource, BytesSource};

#[tokio::test]
async fn test_acquire_then_adjust_then_preview() {
    let original = common::gradient_bitmap(common::PAGE);
    let mut source = BytesSource::new(common::png_bytes(&original), "camera");

    let acquired = source.acquire().await.unwrap();
    assert_eq!(acquired, original);

    let mut session = ScanSession::new(acquired);

    // Simulate a slider drag: many successive adjustments, each
    // re-derived from the original.
    for wire in [80, 120, 160, 200] {
        session.set_contrast_wire(wire);
        let derived = session.current();
        assert_eq!(derived.byte_len(), original.byte_len());
    }
    session.set_mode(FilterMode::Enhance);
    session.set_brightness(25);
    assert_eq!(session.original(), &original);

    let preview = session.encode_current(OutputFormat::Jpeg, 90).unwrap();
    let url = preview.to_data_url();
    assert!(url.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_adjustment_order_does_not_matter() {
    let original = common::gradient_bitmap(common::THUMB);
    let mut first = ScanSession::new(original.clone());
    first.set_brightness(30);
    first.set_contrast_wire(150);
    first.set_mode(FilterMode::Vivid);

    let mut second = ScanSession::new(original);
    second.set_mode(FilterMode::Vivid);
    second.set_contrast_wire(150);
    second.set_brightness(30);

    assert_eq!(first.current(), second.current());
}
