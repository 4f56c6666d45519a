mod render;

use log::info;
use render::render;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use structopt::StructOpt;
use url::Url;
use vidup::{ClientConfig, FileSelection, TaskState, UploadForm, VidupResult};

/// Upload videos for processing and follow the processing task
#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "vidup-cli")]
struct Opts {
    /// base url of the processing API
    #[structopt(short, long, env = "VIDUP_BASE_URL", default_value = "http://127.0.0.1:8000/")]
    base_url: Url,

    /// milliseconds between two task status requests
    #[structopt(short, long, env = "VIDUP_POLL_INTERVAL_MS", default_value = "1000")]
    poll_interval_ms: u64,

    /// request timeout in seconds, none by default
    #[structopt(short, long, env = "VIDUP_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// video files to upload
    #[structopt(parse(from_os_str))]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> VidupResult<()> {
    env_logger::init();

    let Opts {
        base_url,
        poll_interval_ms,
        timeout_secs,
        files,
    } = Opts::from_args();

    let mut config =
        ClientConfig::new(base_url)?.with_poll_interval(Duration::from_millis(poll_interval_ms));
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let selection = FileSelection::from_paths(&files)?;
    info!(
        "uploading {} file(s), {} bytes",
        selection.len(),
        selection.total_size()
    );

    let mut form = UploadForm::new(config)?;
    form.select(selection);
    form.submit()?;

    let mut shown = Vec::new();
    while !form.state().is_settled() {
        let lines = render(form.next_event().await);
        if lines != shown {
            for line in &lines {
                println!("{}", line);
            }
            shown = lines;
        }
    }

    let state = form.state();
    let ok = state.upload_error().is_none() && state.task_status() != Some(&TaskState::Failure);
    form.close();

    if !ok {
        process::exit(1);
    }

    Ok(())
}
