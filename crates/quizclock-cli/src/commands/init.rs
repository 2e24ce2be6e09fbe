//! The `quizclock init` command.

use anyhow::Result;

use quizclock_core::parser::BUILTIN_POOL_TOML;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizclock.toml").exists() {
        println!("quizclock.toml already exists, skipping.");
    } else {
        std::fs::write("quizclock.toml", SAMPLE_CONFIG)?;
        println!("Created quizclock.toml");
    }

    std::fs::create_dir_all("pools")?;
    let example_path = std::path::Path::new("pools/example.toml");
    if example_path.exists() {
        println!("pools/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, BUILTIN_POOL_TOML)?;
        println!("Created pools/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to pools/example.toml");
    println!("  2. Run: quizclock validate --pool pools/example.toml");
    println!("  3. Run: quizclock run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizclock configuration

# Exam length in seconds.
total_time_secs = 120

# Questions drawn from the pool per attempt.
question_count = 5

# Question pool, relative to this file.
pool = "pools/example.toml"
"#;
