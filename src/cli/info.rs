use anyhow::Result;
use std::path::PathBuf;

use super::SourceArgs;

/// Display information about a sample folder or snapshot
pub fn run(input: PathBuf, source: SourceArgs) -> Result<()> {
    let config = source.load_config()?;
    let heat_map = source.open(&input, &config)?;
    let dataset = heat_map.dataset();

    println!("MSHM Dataset Information");
    println!("========================");
    println!("Input: {}", input.display());
    println!("{}", dataset.summary());
    println!();

    println!("Working Area:");
    println!("  Mass limit: {} Da", heat_map.mass_limit());
    println!("  Mass range: {} Da", heat_map.mass_range());
    println!(
        "  Selected:   {} of {} samples",
        heat_map.samples().len(),
        dataset.samples().len()
    );
    println!();

    println!("Samples:");
    for (i, entry) in heat_map.aliases().entries().iter().enumerate() {
        let selected = heat_map.samples().contains(&entry.alias);
        let peaks = dataset.peaks()[i].len();
        print_sample(i + 1, entry.sample.as_str(), &entry.alias, peaks, selected);
    }

    Ok(())
}

fn print_sample(index: usize, sample: &str, alias: &str, peaks: usize, selected: bool) {
    let name = if alias == sample {
        alias.to_string()
    } else {
        format!("{} ({})", alias, sample)
    };
    let marker = if selected { "*" } else { " " };

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        use console::style;
        let marker = if selected {
            style(marker).green().bold()
        } else {
            style(marker).dim()
        };
        println!("  {} {:3}. {} - {} peaks", marker, index, style(name).cyan(), peaks);
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("  {} {:3}. {} - {} peaks", marker, index, name, peaks);
    }
}
