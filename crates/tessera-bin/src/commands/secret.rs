// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` and `hash-password` commands.

use std::fs;
use std::io::{self, Read};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use tessera_config::schema::MIN_SECRET_LENGTH;

use crate::cli::{Cli, GenSecretArgs, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Generates `bytes` random bytes encoded as unpadded URL-safe base64.
pub fn generate_secret(bytes: usize) -> BinResult<String> {
    if bytes < MIN_SECRET_LENGTH {
        return Err(BinError::config(format!(
            "Secret must be at least {} bytes, got {}",
            MIN_SECRET_LENGTH, bytes
        )));
    }

    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Prints or writes a fresh token signing secret.
pub fn gen_secret(_cli: &Cli, args: GenSecretArgs) -> BinResult<()> {
    let secret = generate_secret(args.bytes)?;

    if let Some(path) = &args.output {
        fs::write(path, &secret)
            .map_err(|e| BinError::io(format!("Failed to write secret file: {}", e)))?;
        eprintln!("Secret written to: {}", path.display());
    } else {
        println!("{}", secret);
    }

    eprintln!();
    eprintln!("Store this secret securely. Use it as:");
    eprintln!("  - security.token_secret in the configuration file");
    eprintln!("  - or the TESSERA_TOKEN_SECRET environment variable");

    Ok(())
}

/// Prints the PHC hash of a password.
pub fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    let password = if args.stdin {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| BinError::io(format!("Failed to read from stdin: {}", e)))?;
        input.trim_end_matches(['\r', '\n']).to_string()
    } else {
        args.value.ok_or_else(|| {
            BinError::config("No password provided. Use --stdin or provide a value")
        })?
    };

    if password.is_empty() {
        return Err(BinError::config("Password cannot be empty"));
    }

    println!("{}", tessera_core::hash_password(&password)?);
    Ok(())
}
