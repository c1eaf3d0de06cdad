// Copyright (c) 2020 kprotty
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    collections::LinkedList,
    convert::TryInto,
    fmt,
    hint::black_box,
    ops::Div,
    time::{Duration, Instant},
};

fn bench_all(b: &Benchmarker) {
    b.bench::<TextQueue>();
    b.bench::<VecQueue>();
    b.bench::<StdLinkedList>();
}

trait Subject {
    const NAME: &'static str;

    fn new() -> Self;

    fn insert_tail(&mut self, text: &[u8]);

    fn reverse(&mut self);

    fn sort(&mut self);

    fn drain(&mut self) -> usize;
}

struct TextQueue(textq::Queue);

impl Subject for TextQueue {
    const NAME: &'static str = "textq::Queue";

    fn new() -> Self {
        Self(textq::Queue::new())
    }

    fn insert_tail(&mut self, text: &[u8]) {
        self.0.insert_tail(text).expect("failed to allocate");
    }

    fn reverse(&mut self) {
        self.0.reverse()
    }

    fn sort(&mut self) {
        self.0.sort()
    }

    fn drain(&mut self) -> usize {
        let mut buf = [0u8; 64];
        let mut bytes = 0;
        while let Ok(len) = self.0.remove_head_into(&mut buf) {
            bytes += len;
        }
        bytes
    }
}

struct VecQueue(Vec<Box<[u8]>>);

impl Subject for VecQueue {
    const NAME: &'static str = "Vec<Box<[u8]>>";

    fn new() -> Self {
        Self(Vec::new())
    }

    fn insert_tail(&mut self, text: &[u8]) {
        self.0.push(text.into())
    }

    fn reverse(&mut self) {
        self.0.reverse()
    }

    fn sort(&mut self) {
        self.0.sort()
    }

    fn drain(&mut self) -> usize {
        self.0.drain(..).map(|value| value.len()).sum()
    }
}

struct StdLinkedList(LinkedList<Box<[u8]>>);

impl Subject for StdLinkedList {
    const NAME: &'static str = "LinkedList";

    fn new() -> Self {
        Self(LinkedList::new())
    }

    fn insert_tail(&mut self, text: &[u8]) {
        self.0.push_back(text.into())
    }

    fn reverse(&mut self) {
        let mut reversed = LinkedList::new();
        while let Some(value) = self.0.pop_front() {
            reversed.push_front(value);
        }
        self.0 = reversed;
    }

    fn sort(&mut self) {
        let mut values: Vec<_> = std::mem::take(&mut self.0).into_iter().collect();
        values.sort();
        self.0 = values.into_iter().collect();
    }

    fn drain(&mut self) -> usize {
        let mut bytes = 0;
        while let Some(value) = self.0.pop_front() {
            bytes += value.len();
        }
        bytes
    }
}

struct ArgParser;
impl ArgParser {
    fn parse() -> (Vec<usize>, Vec<usize>, Vec<usize>) {
        let mut args = std::env::args().skip(1).filter(|arg| arg != "--bench").peekable();
        if args.peek().is_none() {
            Self::error("no arguments supplied");
        }

        let counts = Self::parse_item(args.next());
        let text_lens = Self::parse_item(args.next());
        let rounds = Self::parse_item(args.next());
        (counts, text_lens, rounds)
    }

    fn parse_item(input: Option<String>) -> Vec<usize> {
        let input = input.unwrap_or_else(|| Self::error("invalid argument"));
        let mut input = input.as_bytes().iter().peekable();
        let mut results = Vec::new();

        while input.len() > 0 {
            let first = Self::parse_value(&mut input);
            if let Some(b'-') = input.peek() {
                let _ = input.next();
                let second = Self::parse_value(&mut input);
                if second < first {
                    Self::error("invalid range");
                }
                results.extend(first..=second);
            } else {
                results.push(first);
            }

            match input.next() {
                None => break,
                Some(b',') => continue,
                _ => Self::error("invalid continuation"),
            }
        }

        results
    }

    fn parse_value(input: &mut std::iter::Peekable<std::slice::Iter<'_, u8>>) -> usize {
        let mut value = None;
        while let Some(&&c) = input.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            let _ = input.next();
            let digit = (c - b'0') as usize;
            value = Some(value.map_or(digit, |v: usize| (v * 10) + digit));
        }
        value.unwrap_or_else(|| Self::error("invalid value"))
    }

    fn error(message: &str) -> ! {
        eprintln!("Error: {:?}\n", message);
        Self::print_help(std::env::args().next().unwrap());
        std::process::exit(1)
    }

    fn print_help(exe: String) {
        println!("Usage: {} [count] [text_len] [rounds]", exe);
        println!("where:");

        println!();
        println!(" [count]: [csv-ranged]\t\\\\ List of element counts for each benchmark");
        println!(" [text_len]: [csv-ranged]\t\\\\ List of text lengths per element");
        println!(" [rounds]: [csv-ranged]\t\\\\ How many times each benchmark is repeated");

        println!();
        println!(" [csv_ranged]: {{usize}}");
        println!("   | {{usize}} \"-\" {{usize}} \t\t\t\\\\ every value in the range");
        println!("   | [csv_ranged] \",\" [csv_ranged] \t\\\\ multiple permutations");
        println!();
    }
}

#[derive(Default)]
struct BenchmarkResult {
    name: Option<&'static str>,
    fill: Option<f64>,
    reverse: Option<f64>,
    sort: Option<f64>,
    sorted: Option<f64>,
    drain: Option<f64>,
}

impl BenchmarkResult {
    fn lower(value: f64) -> String {
        if value <= 1_000f64 {
            format!("{}ns", value.round())
        } else if value <= 1_000_000f64 {
            format!("{:.2}us", value / 1_000f64)
        } else if value <= 1_000_000_000f64 {
            format!("{:.2}ms", value / 1_000_000f64)
        } else {
            format!("{:.2}s", value / 1_000_000_000f64)
        }
    }
}

impl fmt::Debug for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} |", self.name.unwrap_or("name"))?;
        for (value, label) in [
            (self.fill, "fill"),
            (self.reverse, "reverse"),
            (self.sort, "sort"),
            (self.sorted, "sorted"),
            (self.drain, "drain"),
        ]
        .iter()
        {
            write!(
                f,
                " {:>9} |",
                value.map(Self::lower).unwrap_or_else(|| label.to_string())
            )?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone)]
struct Benchmarker {
    count: usize,
    text_len: usize,
    rounds: usize,
}

impl Benchmarker {
    fn texts(&self) -> Vec<Vec<u8>> {
        let mut prng = 0x9E3779B97F4A7C15u64;
        (0..self.count)
            .map(|_| {
                (0..self.text_len)
                    .map(|_| {
                        prng ^= prng << 13;
                        prng ^= prng >> 7;
                        prng ^= prng << 17;
                        b'a' + (prng % 26) as u8
                    })
                    .collect()
            })
            .collect()
    }

    fn bench<S: Subject>(&self) {
        fn record(f: impl FnOnce()) -> Duration {
            let started = Instant::now();
            f();
            started.elapsed()
        }

        let texts = self.texts();
        let mut totals = [Duration::default(); 5];

        for _ in 0..self.rounds {
            let mut subject = S::new();
            totals[0] += record(|| texts.iter().for_each(|text| subject.insert_tail(text)));
            totals[1] += record(|| subject.reverse());
            totals[2] += record(|| subject.sort());
            totals[3] += record(|| subject.sort());
            totals[4] += record(|| {
                black_box(subject.drain());
            });
        }

        let mean = |total: Duration| -> Option<f64> {
            let nanos: u64 = total.as_nanos().try_into().unwrap();
            Some((nanos as f64).div(self.rounds.max(1) as f64))
        };

        println!(
            "{:?}",
            BenchmarkResult {
                name: Some(S::NAME),
                fill: mean(totals[0]),
                reverse: mean(totals[1]),
                sort: mean(totals[2]),
                sorted: mean(totals[3]),
                drain: mean(totals[4]),
            }
        );
    }
}

pub fn main() {
    let (counts, text_lens, rounds) = ArgParser::parse();

    for &rounds in rounds.iter() {
        for &text_len in text_lens.iter() {
            for &count in counts.iter() {
                let b = Benchmarker {
                    count,
                    text_len,
                    rounds,
                };

                println!(
                    "count={:?} text_len={:?} rounds={:?}\n{}\n{:?}",
                    count,
                    text_len,
                    rounds,
                    "-".repeat(78),
                    BenchmarkResult::default(),
                );

                bench_all(&b);
                println!();
            }
        }
    }
}
