// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::InputError;
use std::io::{BufRead, Read};

/// Collects seeds from `-u`/`--url`, `-l`/`--list`, and stdin when piped
/// (spec §6 "seeds (repeatable); seeds from file; stdin when piped"), in
/// that order. Blank lines are dropped.
pub fn collect_seeds(urls: &[String], list_path: Option<&str>) -> Result<Vec<String>, InputError> {
    let mut seeds: Vec<String> = urls.to_vec();

    if let Some(path) = list_path {
        seeds.extend(read_lines_from_file(path)?);
    }

    if has_stdin() {
        seeds.extend(read_lines_from_stdin());
    }

    Ok(seeds)
}

fn read_lines_from_file(path: &str) -> Result<Vec<String>, InputError> {
    let file = std::fs::File::open(path)
        .map_err(|source| InputError::Unreadable { path: path.to_string(), source })?;
    let reader = std::io::BufReader::new(file);
    Ok(non_blank_lines(reader))
}

fn read_lines_from_stdin() -> Vec<String> {
    non_blank_lines(std::io::stdin().lock())
}

fn non_blank_lines(reader: impl BufRead) -> Vec<String> {
    reader
        .lines()
        .map_while(Result::ok)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Mirrors the original crawler's `stdio.HasStdIn`: true when stdin is piped
/// or redirected rather than an interactive terminal.
fn has_stdin() -> bool {
    !atty::is(atty::Stream::Stdin)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_seeds_drop_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "https://a.test\n\nhttps://b.test\n").unwrap();

        let seeds = read_lines_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(seeds, vec!["https://a.test", "https://b.test"]);
    }

    #[test]
    fn unreadable_file_is_an_input_error() {
        let result = read_lines_from_file("/nonexistent/seeds.txt");
        assert!(matches!(result, Err(InputError::Unreadable { .. })));
    }
}
