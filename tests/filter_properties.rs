//! Property-style checks of the filter/tone transform over a
//! full-range gradient: the invariants every mode must hold regardless
//! of parameters.

mod common;

use docscan::processing::{FilterMode, FilterParams, transform};

const ALL_MODES: [FilterMode; 5] = [
    FilterMode::Original,
    FilterMode::Grayscale,
    FilterMode::BlackAndWhite,
    FilterMode::Enhance,
    FilterMode::Vivid,
];

#[test]
fn test_alpha_untouched_by_every_mode_and_grade() {
    let original = common::gradient_bitmap(common::PAGE);
    for mode in ALL_MODES {
        for (brightness, contrast) in [(0, 1.0), (-100, 0.0), (100, 3.0), (40, 0.3)] {
            let out = transform(
                &original,
                FilterParams {
                    mode,
                    brightness,
                    contrast,
                },
            );
            for y in 0..original.height() {
                for x in 0..original.width() {
                    assert_eq!(
                        out.pixel(x, y)[3],
                        original.pixel(x, y)[3],
                        "alpha changed at ({}, {}) in mode {:?}",
                        x,
                        y,
                        mode
                    );
                }
            }
        }
    }
}

#[test]
fn test_purity_input_unchanged_by_every_mode() {
    let original = common::gradient_bitmap(common::PAGE);
    let reference = original.clone();
    for mode in ALL_MODES {
        let _ = transform(
            &original,
            FilterParams {
                mode,
                brightness: 77,
                contrast: 2.5,
            },
        );
        assert_eq!(original, reference, "input mutated by mode {:?}", mode);
    }
}

#[test]
fn test_dimensions_preserved_by_every_mode() {
    let original = common::gradient_bitmap((17, 5));
    for mode in ALL_MODES {
        let out = transform(
            &original,
            FilterParams {
                mode,
                ..FilterParams::default()
            },
        );
        assert_eq!(out.width(), 17);
        assert_eq!(out.height(), 5);
        assert_eq!(out.byte_len(), original.byte_len());
    }
}

#[test]
fn test_black_and_white_is_binary_everywhere() {
    let out = transform(
        &common::gradient_bitmap(common::PAGE),
        FilterParams {
            mode: FilterMode::BlackAndWhite,
            ..FilterParams::default()
        },
    );
    for y in 0..out.height() {
        for x in 0..out.width() {
            let [r, g, b, _] = out.pixel(x, y);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert!(r == 0 || r == 255);
        }
    }
}

#[test]
fn test_determinism_across_runs() {
    let original = common::gradient_bitmap(common::PAGE);
    for mode in ALL_MODES {
        let params = FilterParams {
            mode,
            brightness: -15,
            contrast: 1.4,
        };
        assert_eq!(transform(&original, params), transform(&original, params));
    }
}

#[test]
fn test_zero_contrast_collapses_to_graded_pivot() {
    // contrast 0 maps every channel to the pivot plus brightness.
    let out = transform(
        &common::gradient_bitmap(common::THUMB),
        FilterParams {
            mode: FilterMode::Original,
            brightness: 10,
            contrast: 0.0,
        },
    );
    for y in 0..out.height() {
        for x in 0..out.width() {
            let [r, g, b, _] = out.pixel(x, y);
            assert_eq!([r, g, b], [138, 138, 138]);
        }
    }
}
