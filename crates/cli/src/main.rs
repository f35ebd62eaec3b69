use std::io::{self, Read};
use std::{env, fs, process};

use transit_catalog::request::{self, Answer, Document};
use transit_catalog::render::RenderSettings;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt().init();

    let input = match read_input() {
        Ok(input) => input,
        Err(err) => {
            error!(%err, "failed reading input");
            process::exit(1);
        }
    };

    let document: Document = match serde_json::from_str(&input) {
        Ok(document) => document,
        Err(err) => {
            error!(%err, "failed parsing request document");
            process::exit(1);
        }
    };

    let render_settings = document.render_settings.clone().unwrap_or_default();
    let builder = request::build_catalog(document.base_requests);
    let catalog = match builder.synchronize(document.routing_settings.into()) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(%err, "failed synchronizing catalog");
            process::exit(1);
        }
    };

    info!(requests = document.stat_requests.len(), "answering stat requests");
    let answers = dispatch(&catalog, &render_settings, document.stat_requests);

    let output = serde_json::to_string(&answers).expect("answers always serialize");
    println!("{output}");
}

#[cfg(feature = "parallel")]
fn dispatch(catalog: &transit_catalog::Catalog, render_settings: &RenderSettings, requests: Vec<request::StatRequest>) -> Vec<Answer> {
    use rayon::prelude::*;
    requests.into_par_iter().map(|r| request::answer(catalog, render_settings, r)).collect()
}

#[cfg(not(feature = "parallel"))]
fn dispatch(catalog: &transit_catalog::Catalog, render_settings: &RenderSettings, requests: Vec<request::StatRequest>) -> Vec<Answer> {
    requests.into_iter().map(|r| request::answer(catalog, render_settings, r)).collect()
}

/// Reads the request document from the path given as the first argument, or
/// from stdin if no argument was given.
fn read_input() -> io::Result<String> {
    match env::args().nth(1) {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
