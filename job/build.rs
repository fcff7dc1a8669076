//! Embeds the commit and build time reported by `samson-job --version`

use std::process::Command;

use chrono::{SecondsFormat, Utc};

fn commit_hash() -> String {
    // Pipelines often build from a tarball without .git; let them pass the commit in
    if let Ok(sha) = std::env::var("SAMSON_JOB_GIT_SHA") {
        if !sha.trim().is_empty() {
            return sha.trim().chars().take(12).collect();
        }
    }

    Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=12"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", commit_hash());
    println!(
        "cargo:rustc-env=BUILD_TIME={}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    println!("cargo:rerun-if-env-changed=SAMSON_JOB_GIT_SHA");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}
