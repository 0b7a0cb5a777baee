use std::collections::HashMap;
use std::env;
use std::io::{self, Write};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../cross/rp2040");
    println!("cargo:rerun-if-changed=../cotton-console");

    if env::var("CARGO_FEATURE_ARM").is_ok() {
        /* Run the inner Cargo without any Cargo-related environment variables
         * from this outer Cargo.
         */
        let filtered_env: HashMap<String, String> = env::vars()
            .filter(|(k, _)| !k.starts_with("CARGO"))
            .collect();
        let child = Command::new("cargo")
            .arg("build")
            .arg("-vv")
            .arg("--bins")
            .arg("--target")
            .arg("thumbv6m-none-eabi")
            .current_dir("../cross/rp2040")
            .env_clear()
            .envs(&filtered_env)
            .output()
            .expect("failed to cross-compile for ARM");
        io::stdout().write_all(&child.stderr).unwrap();
        io::stdout().write_all(&child.stdout).unwrap();
        assert!(child.status.success());
    }
}
