
use scanc::fixed::float2fixed;
use scanc::{fill_path, Bitmap, FillParams, FillRule, Path, Variant};

#[test]
fn t08_png_round_trip() {
    let _ = env_logger::try_init();

    let mut path = Path::new();
    path.move_to(float2fixed(10.0), float2fixed(10.0));
    path.line_to(float2fixed(50.0), float2fixed(90.0));
    path.line_to(float2fixed(90.0), float2fixed(10.0));
    path.close_path();
    path.move_to(float2fixed(30.0), float2fixed(20.0));
    path.curve_to(float2fixed(40.0), float2fixed(60.0), float2fixed(60.0), float2fixed(60.0),
                  float2fixed(70.0), float2fixed(20.0));
    path.close_path();

    let mut params = FillParams::new();
    params.rule(FillRule::EvenOdd).variant(Variant::AnyPartTrapezoids);
    let mut bmp = Bitmap::new(100, 100);
    fill_path(&mut bmp, &path, None, &params, &255).unwrap();
    assert!(bmp.filled() > 1000);

    let file = std::env::temp_dir().join(format!("scanc_t08_{}.png", std::process::id()));
    bmp.to_png(&file).unwrap();
    let back = Bitmap::from_png(&file).unwrap();
    std::fs::remove_file(&file).unwrap();

    assert_eq!(back.width(), 100);
    assert_eq!(back.height(), 100);
    assert!(back.diff(&bmp).is_empty());
    assert_eq!(back.filled(), bmp.filled());

    // A different fill rule changes the picture
    let mut other = Bitmap::new(100, 100);
    fill_path(&mut other, &path, None, params.rule(FillRule::NonZero), &255).unwrap();
    assert!(!back.diff(&other).is_empty());
}

#[test]
fn t08_png_missing_file() {
    let file = std::env::temp_dir().join("scanc_t08_does_not_exist.png");
    assert!(Bitmap::from_png(&file).is_err());
}
