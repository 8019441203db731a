use pnmfilt::codec::{load, save};
use pnmfilt::config::parse_config;
use pnmfilt::pipeline::run_pixel_pipeline;
use pnmfilt::ImageError;
use pretty_assertions::assert_eq;

const COLOUR: &str = "P3
# 2x2 test card
2 2
255
255 0 0    0 255 0
0 0 255    90 120 150
";

#[test]
fn colour_pipeline_from_toml() {
    let config = parse_config(
        r#"
        [[pipeline_modules]]
        name = "SelectColour"
        colour = "blue"

        [[pipeline_modules]]
        name = "Negative"

        [[pipeline_modules]]
        name = "Grayscale"
        "#,
    )
    .unwrap();

    let mut image = load(COLOUR).unwrap();
    run_pixel_pipeline(&mut image, &config).unwrap();

    // blue negated: 255, 255, 0, 105 then (r + g + b) / 3
    assert_eq!(save(&image), "P2\n2 2 255\n170 170\n0 105\n");
}

#[test]
fn pipeline_error_names_the_module() {
    let config = parse_config(
        r#"
        [[pipeline_modules]]
        name = "Grayscale"

        [[pipeline_modules]]
        name = "Grayscale"
        "#,
    )
    .unwrap();

    let mut image = load(COLOUR).unwrap();
    let error = run_pixel_pipeline(&mut image, &config).unwrap_err();
    assert_eq!(error.module, "Grayscale");
    assert!(matches!(error.source, ImageError::UnsupportedOperation(_)));
    assert_eq!(image.channel_count(), 1);
}

#[test]
fn out_of_range_parameter_leaves_image_untouched() {
    let config = parse_config(
        r#"
        [[pipeline_modules]]
        name = "GammaCorrection"
        gamma = -1.0
        "#,
    )
    .unwrap();

    let mut image = load(COLOUR).unwrap();
    let before = image.clone();
    assert!(run_pixel_pipeline(&mut image, &config).is_err());
    assert_eq!(image, before);
}
