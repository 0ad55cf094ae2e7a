use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use crate::resolver::normalize;

/// Print `msg` and read one line. `None` at end of input.
pub fn prompt_line(input: &mut impl BufRead, msg: &str) -> io::Result<Option<String>> {
    print!("{msg}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Yes only for `y`/`Y`.
pub fn confirm(input: &mut impl BufRead, msg: &str) -> io::Result<bool> {
    let answer = prompt_line(input, &format!("{msg} | 'y' for yes "))?;
    Ok(answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")))
}

/// Ask for one champion until the answer normalizes. `None` at end of input.
pub fn read_single(input: &mut impl BufRead) -> io::Result<Option<String>> {
    loop {
        match prompt_line(input, "Champion to scrape quotes from: ")? {
            None => return Ok(None),
            Some(line) if normalize(&line).is_some() => return Ok(Some(line)),
            Some(_) => {}
        }
    }
}

/// Either one comma-separated line, or one name per line finished by `c`.
/// Lines that cannot be a champion name are dropped.
pub fn read_multi(input: &mut impl BufRead) -> io::Result<Vec<String>> {
    println!("Enter a list of champions, separated by commas.");
    println!("Alternatively, enter one champion at a time, and enter \"c\" to complete.");
    let mut names = Vec::new();
    while let Some(line) = prompt_line(input, "  ")? {
        if line.contains(',') {
            names.extend(split_names(&line));
            break;
        }
        if line.trim() == "c" {
            break;
        }
        if normalize(&line).is_some() {
            names.push(line);
        }
    }
    Ok(names)
}

pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Champions found, first occurrence order, no duplicates.
pub fn dedup_found(found: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    found
        .iter()
        .map(String::as_str)
        .filter(|name| seen.insert(*name))
        .collect()
}

pub fn print_summary(inputs: &[String], found: &[String]) {
    println!("Input list:");
    println!("{:?}", inputs);
    println!("Champions found:");
    println!("{:?}", dedup_found(found));
}
