// MaxIO
// Copyright 2020 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Integration tests for the command-line interface that do not need hardware.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use std::process;

/// Runs the binary with `args` and returns its exit code, stdout and stderr.
fn run(args: &[&str]) -> (i32, String, String) {
    let output = process::Command::new(env!("CARGO_BIN_EXE_maxio-devtest"))
        .args(args)
        .output()
        .expect("Failed to execute subprocess");
    let code = output.status.code().expect("Subprocess didn't exit cleanly");
    let stdout = String::from_utf8(output.stdout).expect("Stdout is not valid UTF-8");
    let stderr = String::from_utf8(output.stderr).expect("Stderr is not valid UTF-8");
    (code, stdout, stderr)
}

#[test]
fn test_help() {
    let (code, stdout, stderr) = run(&["--help"]);
    assert_eq!(0, code);
    assert!(stdout.starts_with("Usage: maxio-devtest [options]\n"));
    let flags = ["--blink-ms", "--clock-hz", "--count", "--dump", "--same-frame-reads", "--verify"];
    for flag in flags {
        assert!(stdout.contains(flag), "Missing {} in help", flag);
    }
    assert!(stderr.is_empty());
}

#[test]
fn test_version() {
    let (code, stdout, stderr) = run(&["--version"]);
    assert_eq!(0, code);
    assert!(stdout.starts_with(&format!("MaxIO devtest {}\n", env!("CARGO_PKG_VERSION"))));
    assert!(stdout.contains("License Apache Version 2.0"));
    assert!(stderr.is_empty());
}

#[test]
fn test_unknown_flag() {
    let (code, stdout, stderr) = run(&["--foo"]);
    assert_eq!(2, code);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Usage error: "));
    assert!(stderr.contains("--help for more information"));
}

#[test]
fn test_too_many_arguments() {
    let (code, _stdout, stderr) = run(&["extra"]);
    assert_eq!(2, code);
    assert!(stderr.starts_with("Usage error: Too many arguments\n"));
}

#[test]
fn test_invalid_number() {
    let (code, _stdout, stderr) = run(&["--count", "lots"]);
    assert_eq!(2, code);
    assert!(stderr.starts_with("Usage error: Invalid value 'lots' for --count\n"));

    let (code, _stdout, stderr) = run(&["--clock-hz=fast"]);
    assert_eq!(2, code);
    assert!(stderr.starts_with("Usage error: Invalid value 'fast' for --clock-hz\n"));
}
