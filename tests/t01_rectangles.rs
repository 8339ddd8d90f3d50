
use scanc::fixed::int2fixed;
use scanc::{fill_path, Bitmap, FillParams, FillRule, Path, Variant};

const VARIANTS: [Variant; 4] = [
    Variant::CentreSpans,
    Variant::AnyPartSpans,
    Variant::CentreTrapezoids,
    Variant::AnyPartTrapezoids,
];

fn fill(path: &Path, variant: Variant, rule: FillRule) -> Bitmap {
    let mut params = FillParams::new();
    params.variant(variant).rule(rule);
    let mut bmp = Bitmap::new(32, 32);
    fill_path(&mut bmp, path, None, &params, &255).unwrap();
    bmp
}

#[test]
fn t01_rectangles() {
    let _ = env_logger::try_init();

    // Pixel aligned rectangle: every variant paints exactly the
    // covered pixels, once each
    let mut path = Path::new();
    path.rect(int2fixed(3), int2fixed(2), int2fixed(20), int2fixed(27));
    for &v in VARIANTS.iter() {
        for &rule in &[FillRule::NonZero, FillRule::EvenOdd] {
            let bmp = fill(&path, v, rule);
            assert_eq!(bmp.filled(), 17 * 25, "{:?} {:?}", v, rule);
            assert_eq!(bmp.max_hits(), 1, "{:?} {:?}", v, rule);
            for y in 0 .. 32 {
                for x in 0 .. 32 {
                    let inside = x >= 3 && x < 20 && y >= 2 && y < 27;
                    assert_eq!(bmp[(x, y)] == 255, inside, "{:?} {:?} at ({},{})", v, rule, x, y);
                }
            }
        }
    }
}

#[test]
fn t01_rectangles_reversed() {
    // Drawn counter clockwise, same pixels
    let mut path = Path::new();
    path.polygon(&[(int2fixed(3), int2fixed(2)), (int2fixed(3), int2fixed(27)),
                   (int2fixed(20), int2fixed(27)), (int2fixed(20), int2fixed(2))]);
    let mut fwd = Path::new();
    fwd.rect(int2fixed(3), int2fixed(2), int2fixed(20), int2fixed(27));
    for &v in VARIANTS.iter() {
        let a = fill(&path, v, FillRule::NonZero);
        let b = fill(&fwd, v, FillRule::NonZero);
        assert!(a.diff(&b).is_empty(), "{:?}", v);
    }
}

#[test]
fn t01_rectangles_subpixel() {
    // x from 2.25 to 5.75, y from 1.25 to 3.39
    let mut path = Path::new();
    path.rect(int2fixed(2) + 64, int2fixed(1) + 64, int2fixed(5) + 192, int2fixed(3) + 100);

    // Centres (2.5 .. 5.5) x (1.5, 2.5)
    let bmp = fill(&path, Variant::CentreSpans, FillRule::NonZero);
    assert_eq!(bmp.filled(), 4 * 2);
    assert_eq!(bmp[(2, 1)], 255);
    assert_eq!(bmp[(5, 2)], 255);
    assert_eq!(bmp[(5, 3)], 0);

    // Columns 2 ..= 5, rows 1 ..= 3
    let bmp = fill(&path, Variant::AnyPartSpans, FillRule::NonZero);
    assert_eq!(bmp.filled(), 4 * 3);
    assert_eq!(bmp[(2, 3)], 255);
    assert_eq!(bmp[(6, 3)], 0);
    assert_eq!(bmp[(2, 4)], 0);
    assert_eq!(bmp.max_hits(), 1);
}
