use std::{
    env,
    io::{self, ErrorKind},
    num::NonZeroUsize,
    process, thread,
};

use log::info;
use machine_learning::Layer;
use orchestrator::{
    ClusterContext, LayerOrchestrator, configs::RunConfig, sources::CsvRecordReader,
};
use tokio::{signal, task};

const USAGE: &str = "usage: orchestrator <run-config.json> <records-file> <label-index>";

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(conf_path), Some(records_path), Some(label_index)) =
        (args.next(), args.next(), args.next())
    else {
        return Err(io::Error::new(ErrorKind::InvalidInput, USAGE));
    };

    let label_index: usize = label_index.parse().map_err(|e| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("invalid label index {label_index:?}: {e}"),
        )
    })?;

    let run = RunConfig::load(&conf_path)?;
    let workers = workers()?;
    let ctx = ClusterContext::new(workers).map_err(io::Error::other)?;
    info!("training on {records_path} with {workers} worker(s)");

    let fit = task::spawn_blocking(move || -> orchestrator::Result<Vec<f32>> {
        let reader = CsvRecordReader::new(run.delimiter);
        let mut orchestrator =
            LayerOrchestrator::new(ctx, &run.layer)?.with_reduction(run.reduction);

        let layer = orchestrator.fit_path(&records_path, label_index, &reader)?;
        Ok(layer.params().to_vec())
    });

    tokio::select! {
        ret = fit => {
            let params = ret.map_err(io::Error::other)??;
            println!("{}", serde_json::to_string(&params)?);
            info!("training finished");
        }
        _ = signal::ctrl_c() => {
            info!("received SIGINT, aborting");
            process::exit(130);
        }
    }

    Ok(())
}

/// Reads the size of the pool from `WORKERS`, defaulting to the available parallelism.
fn workers() -> io::Result<NonZeroUsize> {
    match env::var("WORKERS") {
        Ok(workers) => workers.parse().map_err(|e| {
            io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid WORKERS {workers:?}: {e}"),
            )
        }),
        Err(_) => thread::available_parallelism(),
    }
}
