//! Example usage of the Savitzky-Golay smoother crate
//!
//! Run with `RUST_LOG=debug cargo run --example basic_usage` to see kernel
//! rebuilds and skipped points.

use savgol_smoother::{
    smooth_uniform, smooth_xy, FastUniformSmoother, GeneralSmoother, SmootherParams,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Savitzky-Golay Smoother Examples ===\n");

    // Create some noisy test data
    let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
    let clean_signal: Vec<f64> = x
        .iter()
        .map(|&t| (2.0 * std::f64::consts::PI * t).sin() + 0.5 * (4.0 * std::f64::consts::PI * t).cos())
        .collect();

    let mut noisy_signal = clean_signal.clone();
    for (i, v) in noisy_signal.iter_mut().enumerate() {
        if i % 3 == 0 {
            *v += 0.3 * (i as f64 % 2.0 - 0.5);
        }
    }

    println!("Original noisy signal:");
    print_signal(&noisy_signal);

    // Example 1: convenience function, fast kernel
    println!("\n1. Uniform smoothing (left=2, right=2, degree=2):");
    print_signal(&smooth_uniform(&noisy_signal, 2, 2, 2)?);

    // Example 2: per-point fits on the same samples, edges extrapolated
    println!("\n2. General smoothing (left=2, right=2, degree=2):");
    print_signal(&smooth_xy(&x, &noisy_signal, 2, 2, 2)?);

    // Example 3: uneven spacing, smoothing only part of the buffer in place
    println!("\n3. Uneven spacing, indices 5..=14 only:");
    let uneven_x: Vec<f64> = (0..20).map(|i| (i as f64 * 0.1).powf(1.3)).collect();
    let mut y: Vec<f64> = uneven_x.iter().map(|t| (3.0 * t).sin()).collect();
    for v in y.iter_mut().step_by(4) {
        *v += 0.2;
    }
    let general = GeneralSmoother::new(SmootherParams::new(3, 3, 3)?)?;
    let report = general.smooth(&mut y, Some(&uneven_x[..]), 5, 14)?;
    print_signal(&y);
    println!("smoothed {} points, skipped {}", report.smoothed, report.skipped);

    // Example 4: changing parameters rebuilds the kernel explicitly
    println!("\n4. Kernel weights before and after set_params:");
    let mut fast = FastUniformSmoother::new(SmootherParams::new(2, 2, 2)?);
    if let Some(kernel) = fast.kernel() {
        print_signal(&kernel.smoothing_weights());
    }
    fast.set_params(fast.params().with_left(3)?.with_right(3)?);
    if let Some(kernel) = fast.kernel() {
        print_signal(&kernel.smoothing_weights());
    }

    // Example 5: first derivative from the kernel's derivative row
    println!("\n5. First derivative (left=3, right=3, degree=3, delta=0.1):");
    let deriv = FastUniformSmoother::new(SmootherParams::new(3, 3, 3)?)
        .differentiate(&clean_signal, 1, 0.1)?;
    let deriv: Vec<f64> = deriv.into_iter().map(|d| d.unwrap_or(f64::NAN)).collect();
    print_signal(&deriv);

    // Example 6: performance on a large dataset
    println!("\n6. Performance test with large dataset:");
    let large_data: Vec<f64> = (0..100_000)
        .map(|i| (i as f64 * 0.001).sin() + 0.1 * (i as f64 * 0.01).cos())
        .collect();
    let large_x: Vec<f64> = (0..large_data.len()).map(|i| i as f64).collect();

    let start = std::time::Instant::now();
    let _fast = smooth_uniform(&large_data, 5, 5, 3)?;
    println!("fast kernel:     {} points in {:?}", large_data.len(), start.elapsed());

    let start = std::time::Instant::now();
    let _general = smooth_xy(&large_x, &large_data, 5, 5, 3)?;
    println!("per-point solve: {} points in {:?}", large_data.len(), start.elapsed());

    Ok(())
}

fn print_signal(signal: &[f64]) {
    for (i, &value) in signal.iter().enumerate() {
        print!("{:7.3}", value);
        if (i + 1) % 8 == 0 {
            println!();
        }
    }
    if signal.len() % 8 != 0 {
        println!();
    }
}
