//! The `quizclock validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizclock_core::parser;

pub fn execute(pool_path: PathBuf) -> Result<()> {
    let pools = parser::load_pools(&pool_path)?;
    anyhow::ensure!(
        !pools.is_empty(),
        "no question pools found in {}",
        pool_path.display()
    );

    let mut total_warnings = 0;

    for pool in &pools {
        println!("Pool: {} ({} questions)", pool.name, pool.len());

        let warnings = parser::validate_pool(pool);
        for w in &warnings {
            let prefix = w
                .question_id
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All pools valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
