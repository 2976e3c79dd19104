//! The `entrance init` command.

use std::path::Path;

use anyhow::Result;

use entrance_core::store::RecordStore;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    if Path::new("entrance.toml").exists() {
        println!("entrance.toml already exists, skipping.");
    } else {
        std::fs::write("entrance.toml", SAMPLE_CONFIG)?;
        println!("Created entrance.toml");
    }

    let mut store = ctx.open_store()?;
    let count = store.len()?;
    println!(
        "Student store: {} ({} records)",
        store.path().display(),
        count
    );

    println!("\nNext steps:");
    println!("  1. Register a student: entrance register --id 1 --name \"...\"");
    println!("  2. Sit the exam:       entrance exam 1");
    println!("  3. See the results:    entrance rankings");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# entrance configuration

data_file = "data/student.dat"
output_dir = "entrance-output"
# log_file = "logs/entrance.log"

[exam]
duration_minutes = 20
pass_threshold = 3.0
# Fraction of a question's marks lost for a wrong answer.
negative_marking = 0.1

[ranking]
page_size = 10
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use entrance_core::config::EntranceConfig;

    #[test]
    fn sample_config_parses_to_defaults() {
        let config: EntranceConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, EntranceConfig::default());
    }
}
