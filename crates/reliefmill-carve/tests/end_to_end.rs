use reliefmill_carve::{CarvingParameters, ReliefCarver};
use reliefmill_core::ElevationMatrix;

fn params(diameters: &[f64]) -> CarvingParameters {
    CarvingParameters {
        width_mm: 10.0,
        length_mm: 10.0,
        height_mm: 10.0,
        tool_diameters: diameters.to_vec(),
        feed_rate: None,
        step_down: None,
    }
}

/// Extract every Z coordinate from cut and plunge moves.
fn z_values(gcode: &str) -> Vec<f64> {
    gcode
        .lines()
        .flat_map(|line| line.split_whitespace())
        .filter_map(|field| field.strip_prefix('Z'))
        .filter_map(|z| z.parse().ok())
        .collect()
}

#[test]
fn all_zero_heightmap_carves_to_full_depth() {
    // 10x10 fully-deep stock, one radius-1 tool, 2 mm roughing steps.
    let matrix = ElevationMatrix::from_raw(10, 10, vec![0; 100]);
    let mut p = params(&[2.0]);
    p.step_down = Some(2.0);
    let carver = ReliefCarver::from_matrix(matrix, p).unwrap();

    let programs = carver.generate_programs();
    assert_eq!(programs.len(), 1);
    let gcode = &programs[0].1;

    assert!(gcode.starts_with("G21\nM3\nG00 Z5\n"));
    assert!(gcode.ends_with("M5\n"));

    // The deepest level (0) maps to Z -10; roughing reaches it and never
    // goes beyond.
    assert!(gcode.contains("Z-10.000"));
    assert!(gcode.matches("G00 Z-2.000").count() >= 1);
    for z in z_values(gcode) {
        assert!(z >= -10.000001, "cut below full depth: {z}");
    }
}

#[test]
fn background_heightmap_produces_only_framing() {
    let matrix = ElevationMatrix::from_raw(10, 10, vec![255; 100]);
    let carver = ReliefCarver::from_matrix(matrix, params(&[8.0, 3.0, 1.0])).unwrap();

    let programs = carver.generate_programs();
    assert_eq!(programs.len(), 3);

    let diameters: Vec<f64> = programs.iter().map(|(t, _)| t.diameter).collect();
    assert_eq!(diameters, vec![8.0, 3.0, 1.0]);

    for (_, gcode) in &programs {
        assert_eq!(gcode, "G21\nM3\nG00 Z5\nM5\n");
    }
}

#[test]
fn smaller_tool_only_sees_remaining_material() {
    // A single pocket: the larger tool clears the interior; the smaller
    // tool's pass still produces a segment for the near-wall band.
    let mut data = vec![255u8; 24 * 24];
    for y in 4..20 {
        for x in 4..20 {
            data[y * 24 + x] = 0;
        }
    }
    let matrix = ElevationMatrix::from_raw(24, 24, data);
    let mut p = params(&[4.0, 1.0]);
    p.width_mm = 24.0;
    p.length_mm = 24.0;
    let carver = ReliefCarver::from_matrix(matrix, p).unwrap();

    let plans = carver.plan();
    assert_eq!(plans.len(), 2);
    assert!(!plans[0].segments.is_empty(), "large tool should cut");
    assert!(!plans[1].segments.is_empty(), "small tool refines the walls");
}

#[test]
fn programs_are_written_one_file_per_tool() {
    let matrix = ElevationMatrix::from_raw(10, 10, vec![0; 100]);
    let carver = ReliefCarver::from_matrix(matrix, params(&[2.5, 1.0])).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = carver.write_programs(dir.path()).unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(written[0].file_name().unwrap(), "path-M2.5.ngc");
    assert_eq!(written[1].file_name().unwrap(), "path-M1.ngc");
    for path in &written {
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("G21\n"));
        assert!(contents.ends_with("M5\n"));
    }
}

#[test]
fn heightmap_loads_from_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relief.png");
    let mut img = image::RgbImage::new(10, 10);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgb([255, 255, 255]);
    }
    for y in 3..7 {
        for x in 3..7 {
            img.put_pixel(x, y, image::Rgb([0, 0, 0]));
        }
    }
    img.save(&path).unwrap();

    let carver = ReliefCarver::from_file(&path, params(&[2.0])).unwrap();
    let programs = carver.generate_programs();
    assert!(programs[0].1.contains("G01"));
}

#[test]
fn missing_image_file_is_a_fatal_error() {
    let result = ReliefCarver::from_file("does-not-exist.png", params(&[2.0]));
    assert!(result.is_err());
}
