use forgery_detect::{analysis::ela::ElaAnalyzer, error::Result};

fn main() -> Result<()> {
    let input = std::env::args().nth(1).unwrap_or_else(|| "evidences/sample.jpg".into());
    let image = image::open(&input)?;
    std::fs::create_dir_all("output")?;

    for quality in [95, 90, 85] {
        println!("Analyzing {} at quality {}... ", input, quality);

        let ela_result = ElaAnalyzer::new(quality).analyze(&image)?;

        let ela_output = format!("output/ela_q{}.png", quality);
        ela_result.save(&ela_output)?;

        println!("  Max difference: {}", ela_result.max_difference);
        println!("  Scale factor: {:.2}", ela_result.scale);
        println!("  Mean difference: {:.2}", ela_result.mean_difference);
        println!("  Output: {}", ela_output);
        println!();
    }

    Ok(())
}
