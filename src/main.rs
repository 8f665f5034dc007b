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

use clap::Parser;
use futures::StreamExt;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use scoutcrawl::args::Args;
use scoutcrawl::config::{Config, FileConfig};
use scoutcrawl::output::{self, Format, Writer};
use scoutcrawl::{input, Engine};
use std::path::Path;
use std::process::ExitCode;
use tokio::sync::mpsc;

const BANNER: &str = r#"
                                __                          __
   ______________  __  __/ /_____________ __      __/ /
  / ___/ ___/ __ \/ / / / __/ ___/ ___/ __ `/ | /| / / /
 (__  ) /__/ /_/ / /_/ / /_/ /__/ /  / /_/ /| |/ |/ / /
/____/\___/\____/\__,_/\__/\___/_/   \__,_/ |__/|__/_/
"#;

fn configure_logging(args: &Args) {
    let level = if args.silent {
        LevelFilter::Error
    } else if args.debug {
        LevelFilter::Debug
    } else if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let pattern = if args.monochrome { "{l} {d} {m}{n}" } else { "{h({l})} {d} {m}{n}" };

    let console = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(pattern))).build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(level))
        .expect("static log4rs config is always valid");

    let _ = log4rs::init_config(config);
}

fn print_banner(args: &Args) {
    if !args.silent {
        eprintln!("{BANNER}");
        eprintln!("                scoutcrawl v{}\n", env!("CARGO_PKG_VERSION"));
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(&args);
    print_banner(&args);

    let file_config = match FileConfig::load_or_default(Path::new(&args.config)) {
        Ok(config) => config,
        Err(error) => {
            log::error!("could not load config file {}: {error}", args.config);
            return ExitCode::FAILURE;
        }
    };

    let config = Config::merge(file_config, &args);

    let seeds = match input::collect_seeds(&args.urls, args.list.as_deref()) {
        Ok(seeds) if !seeds.is_empty() => seeds,
        Ok(_) => {
            log::error!("no seeds provided: pass -u, -l, or pipe seeds on stdin");
            return ExitCode::FAILURE;
        }
        Err(error) => {
            log::error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let engine = match Engine::new(config).await {
        Ok(engine) => std::sync::Arc::new(engine),
        Err(error) => {
            log::error!("could not initialize the crawl engine: {error}");
            return ExitCode::FAILURE;
        }
    };

    let format = if args.jsonl { Format::Jsonl } else { Format::Lines };

    let run = async {
        let (seed_tx, seed_rx) = mpsc::channel(seeds.len().max(1));
        for seed in seeds {
            let _ = seed_tx.send(seed).await;
        }
        drop(seed_tx);

        let mut events = Box::pin(engine.crawl_many(seed_rx));

        match args.output.as_deref() {
            Some(path) => {
                let file = output::open_file(path)?;
                let mut writer = Writer::new(file, format);
                while let Some(event) = events.next().await {
                    log_event(&event);
                    writer.write(&event)?;
                }
            }
            None => {
                let mut writer = Writer::new(std::io::stdout(), format);
                while let Some(event) = events.next().await {
                    log_event(&event);
                    writer.write(&event)?;
                }
            }
        }

        Ok::<(), scoutcrawl::WriteError>(())
    };

    match run.await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("write error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn log_event(event: &scoutcrawl::CrawlEvent) {
    if let scoutcrawl::CrawlEvent::Error { source, error } = event {
        log::debug!("[{source}] {error}");
    }
}
