use std::process;
use log::error;
use crate::initialization::init;

mod chart;
mod config;
mod errors;
mod fields;
mod initialization;
mod manager_chromium;
mod manager_eink;
mod manager_meteo;
mod models;
mod pipeline;
mod template;

fn main() {
    let (config, mut mgr) = match init() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = pipeline::run(&config, &mut mgr) {
        error!("{}", e);
        process::exit(1);
    }
}
