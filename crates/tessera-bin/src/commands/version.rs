// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints crate versions and compiled-in store backends.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Tessera - user account and session service");
    println!();
    println!("Version Information:");
    println!("  tessera-bin:    {}", crate::VERSION);
    println!("  tessera-core:   {}", tessera_core::VERSION);
    println!("  tessera-api:    {}", tessera_api::VERSION);
    println!("  tessera-config: {}", tessera_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("Store Backends:");
    println!("  memory:       enabled");
    println!("  PostgreSQL:   {}", enabled(cfg!(feature = "postgres")));
    println!("  Redis:        {}", enabled(cfg!(feature = "redis")));
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}

fn enabled(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}
