//! Coefficient files and face images written to disk and read back.

use approx::assert_abs_diff_eq;
use sh_cubemap::coefficients::ShCoefficients;
use sh_cubemap::core::{CubeFace, CubeMap, Rgb, Rgba};
use sh_cubemap::io::{
    from_json_str, load_cubemap, read_coefficients, to_json_string, write_coefficients, write_cubemap,
    FileFormat, ImageScale,
};
use sh_cubemap::Pixel;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_json_round_trip_rgb() {
    let values: Vec<Rgb<f64>> = (0..16)
        .map(|i| Rgb::new(i as f64 * 0.123_456_789, -(i as f64).sqrt(), 1.0 / (i + 1) as f64))
        .collect();
    let coeffs = ShCoefficients::from_vec(values).unwrap();

    let json = to_json_string(&coeffs).unwrap();
    let back: ShCoefficients<Rgb<f64>> = from_json_str(&json).unwrap();

    assert_eq!(back.order(), 3);
    for (a, b) in back.as_slice().iter().zip(coeffs.as_slice()) {
        assert_abs_diff_eq!(a.r, b.r, epsilon = 1e-6);
        assert_abs_diff_eq!(a.g, b.g, epsilon = 1e-6);
        assert_abs_diff_eq!(a.b, b.b, epsilon = 1e-6);
    }
}

#[test]
fn test_json_file_round_trip_rgba() {
    let path = scratch_dir("json_rgba").join("coefficients.json");
    let coeffs = ShCoefficients::from_vec(vec![Rgba::<f64>::new(0.1, 0.2, 0.3, 0.4); 9]).unwrap();

    write_coefficients(&path, &coeffs).unwrap();
    let back: ShCoefficients<Rgba<f64>> = read_coefficients(&path).unwrap();
    assert_eq!(back.order(), 2);
    assert_abs_diff_eq!(back[8].a, 0.4, epsilon = 1e-6);

    // Reading four channels as three drops alpha.
    let rgb: ShCoefficients<Rgb<f64>> = read_coefficients(&path).unwrap();
    assert_abs_diff_eq!(rgb[8].b, 0.3, epsilon = 1e-6);
}

#[test]
fn test_images_round_trip_with_face_layout() {
    let dir = scratch_dir("faces_png");
    // Distinct value per face and a vertical ramp to catch flips.
    let cubemap = CubeMap::from_texel_fn(6, |face, _s, t| {
        Rgb::<f64>::new(face.index() as f64 * 40.0, (t + 1.0) * 120.0, 7.0)
    });

    let paths = write_cubemap(&dir, FileFormat::Png, &cubemap, "rt_", ImageScale::default()).unwrap();
    assert!(paths[3].ends_with("rt_negy.png"));

    let faces: [PathBuf; 6] = paths.try_into().unwrap();
    let loaded: CubeMap<Rgb<f64>> = load_cubemap(&faces, ImageScale::default()).unwrap();
    assert_eq!(loaded.size(), 6);

    for face in CubeFace::ALL {
        for (a, b) in loaded.face(face).pixels().iter().zip(cubemap.face(face).pixels()) {
            assert_abs_diff_eq!(a.r, b.r, epsilon = 1.0);
            assert_abs_diff_eq!(a.g, b.g, epsilon = 1.0);
            assert_abs_diff_eq!(a.b, b.b, epsilon = 1.0);
        }
    }
}

#[test]
fn test_gamma_round_trip() {
    let dir = scratch_dir("faces_gamma");
    let scale = ImageScale { gamma: 2.2, scale: 1.0 };
    let cubemap = CubeMap::uniform(2, Rgb::<f64>::new(0.05, 0.5, 0.9));

    let paths = write_cubemap(&dir, FileFormat::Tga, &cubemap, "", scale).unwrap();
    let faces: [PathBuf; 6] = paths.try_into().unwrap();
    let loaded: CubeMap<Rgb<f64>> = load_cubemap(&faces, scale).unwrap();

    let p = loaded.face(CubeFace::PositiveZ).get(0, 0).unwrap();
    assert_abs_diff_eq!(p.g, 0.5, epsilon = 1e-2);
    assert_abs_diff_eq!(p.b, 0.9, epsilon = 1e-2);
}

#[test]
fn test_mismatched_faces_are_rejected() {
    let dir = scratch_dir("faces_mismatch");
    let big = CubeMap::uniform(4, Rgb::<f64>::splat(10.0));
    let small = CubeMap::uniform(2, Rgb::<f64>::splat(10.0));
    let big_paths = write_cubemap(&dir, FileFormat::Bmp, &big, "big_", ImageScale::default()).unwrap();
    let small_paths = write_cubemap(&dir, FileFormat::Bmp, &small, "small_", ImageScale::default()).unwrap();

    let mut faces: [PathBuf; 6] = big_paths.try_into().unwrap();
    faces[4] = small_paths[4].clone();
    assert!(load_cubemap::<Rgb<f64>>(&faces, ImageScale::default()).is_err());
}
