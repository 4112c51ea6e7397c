use std::io;
use std::time::Instant;

use vibspectra::{
    InclusionRange, LineShapeKind, PeakDetector, SpectralConvolver, SpectralLine,
};

const LINES: [(f64, f64); 12] = [
    (412.7, 8.1),
    (745.3, 61.4),
    (781.9, 22.0),
    (1021.4, 14.6),
    (1163.8, 9.3),
    (1384.2, 31.7),
    (1455.0, 18.2),
    (1596.6, 44.9),
    (1621.1, 12.5),
    (2874.3, 38.8),
    (2931.7, 57.2),
    (3062.5, 20.4),
];

fn main() -> io::Result<()> {
    pretty_env_logger::init();

    let lines: Vec<SpectralLine> = LINES.iter().copied().map(SpectralLine::from).collect();
    let convolver = SpectralConvolver::builder()
        .start(8.0)
        .end(4000.0)
        .numpts(500)
        .width(10.0)
        .build();

    let start = Instant::now();
    let spectrum = match convolver.broaden(&lines, &LineShapeKind::Lorentzian) {
        Ok(spectrum) => spectrum,
        Err(err) => {
            println!("Encountered error {:?}", err);
            return Ok(());
        }
    };
    println!(
        "Broadening {} lines took microseconds {}",
        lines.len(),
        (Instant::now() - start).as_micros()
    );

    let wavelengths = spectrum.map_x(|x| 10000.0 / x);
    let detector = PeakDetector {
        inclusion_ranges: vec![InclusionRange::new(6.0, 6.4), InclusionRange::new(12.0, 13.0)],
        ..PeakDetector::default()
    };
    match detector.detect_peaks_in(&wavelengths) {
        Ok(peaks) => {
            println!("Found {} peaks", peaks.len());
            for (i, (x, y)) in peaks.iter().zip(wavelengths.points_at(&peaks)) {
                println!("\t{}\t{:0.3} um\t{:0.3} cm-1\t{:0.4}", i, x, 10000.0 / x, y);
            }
        }
        Err(err) => println!("Encountered error {:?}", err),
    };
    Ok(())
}
