#![allow(dead_code)]

use serde_json::json;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use url::Url;
use uuid::Uuid;
use vidup::{ClientConfig, FileSelection, FormState, UploadForm};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Reply, Response};
use warp::Filter;

#[derive(Debug, Clone)]
pub enum UploadReply {
    Accept { message: String },
    Reject(StatusCode),
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub parts: usize,
    pub file_names: Vec<String>,
    pub body_len: usize,
}

#[derive(Debug, Clone)]
pub struct RecordedPoll {
    pub task_id: String,
    pub at: Instant,
}

struct Shared {
    upload_reply: Mutex<UploadReply>,
    statuses: Mutex<VecDeque<(String, u8)>>,
    uploads: Mutex<Vec<RecordedUpload>>,
    task_ids: Mutex<Vec<String>>,
    polls: Mutex<Vec<RecordedPoll>>,
    stalled_polls: Mutex<usize>,
}

/// In-process stand-in for the processing API.
pub struct MockApi {
    pub addr: SocketAddr,
    shared: Arc<Shared>,
}

impl MockApi {
    /// `statuses` are served in order; the last one repeats forever.
    pub fn start(upload_reply: UploadReply, statuses: &[(&str, u8)]) -> Self {
        let shared = Arc::new(Shared {
            upload_reply: Mutex::new(upload_reply),
            statuses: Mutex::new(
                statuses
                    .iter()
                    .map(|(state, progress)| (state.to_string(), *progress))
                    .collect(),
            ),
            uploads: Mutex::new(Vec::new()),
            task_ids: Mutex::new(Vec::new()),
            polls: Mutex::new(Vec::new()),
            stalled_polls: Mutex::new(0),
        });

        let with_shared = {
            let shared = shared.clone();
            warp::any().map(move || shared.clone())
        };

        let process = warp::post()
            .and(warp::path("process-video"))
            .and(warp::body::bytes())
            .and(with_shared.clone())
            .map(process_video);

        let status = warp::get()
            .and(warp::path!("task-status" / String))
            .and(with_shared)
            .and_then(task_status);

        let (addr, server) = warp::serve(process.or(status)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        Self { addr, shared }
    }

    pub fn accepting(statuses: &[(&str, u8)]) -> Self {
        Self::start(
            UploadReply::Accept {
                message: "Video processing started".into(),
            },
            statuses,
        )
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    pub fn config(&self, poll_interval: Duration) -> ClientConfig {
        ClientConfig::new(self.base_url())
            .unwrap()
            .with_poll_interval(poll_interval)
            .with_timeout(Duration::from_secs(10))
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.shared.uploads.lock().unwrap().clone()
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.shared.task_ids.lock().unwrap().clone()
    }

    pub fn polls(&self) -> Vec<RecordedPoll> {
        self.shared.polls.lock().unwrap().clone()
    }

    /// The next `n` status requests are recorded but never answered.
    pub fn stall_polls(&self, n: usize) {
        *self.shared.stalled_polls.lock().unwrap() = n;
    }

    pub fn poll_count(&self) -> usize {
        self.shared.polls.lock().unwrap().len()
    }
}

fn process_video(body: Bytes, shared: Arc<Shared>) -> Response {
    let text = String::from_utf8_lossy(&body);

    let file_names = text
        .match_indices("filename=\"")
        .map(|(i, m)| {
            let rest = &text[i + m.len()..];
            rest[..rest.find('"').unwrap_or(0)].to_string()
        })
        .collect();

    shared.uploads.lock().unwrap().push(RecordedUpload {
        parts: text.matches("name=\"file\"").count(),
        file_names,
        body_len: body.len(),
    });

    match shared.upload_reply.lock().unwrap().clone() {
        UploadReply::Accept { message } => {
            let task_id = Uuid::new_v4().to_string();
            shared.task_ids.lock().unwrap().push(task_id.clone());
            warp::reply::json(&json!({ "message": message, "task_id": task_id })).into_response()
        }
        UploadReply::Reject(status) => warp::reply::with_status(
            warp::reply::json(&json!({ "detail": "processing backend unavailable" })),
            status,
        )
        .into_response(),
    }
}

async fn task_status(task_id: String, shared: Arc<Shared>) -> Result<Response, Infallible> {
    shared.polls.lock().unwrap().push(RecordedPoll {
        task_id,
        at: Instant::now(),
    });

    let stall = {
        let mut stalled = shared.stalled_polls.lock().unwrap();
        let stall = *stalled > 0;
        *stalled = stalled.saturating_sub(1);
        stall
    };

    if stall {
        sleep(Duration::from_secs(60)).await;
    }

    Ok(next_status(&shared))
}

fn next_status(shared: &Shared) -> Response {
    let mut statuses = shared.statuses.lock().unwrap();
    let (state, progress) = if statuses.len() > 1 {
        statuses.pop_front().unwrap()
    } else {
        statuses
            .front()
            .cloned()
            .unwrap_or_else(|| ("PENDING".to_string(), 0))
    };

    warp::reply::json(&json!({ "state": state, "progress": progress })).into_response()
}

/// Writes small fake videos into a fresh directory.
pub fn video_files(test: &str, files: &[(&str, usize)]) -> (PathBuf, FileSelection) {
    let dir = std::env::temp_dir().join(format!("vidup-{}-{}", test, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let paths: Vec<_> = files
        .iter()
        .map(|(name, size)| {
            let path = dir.join(name);
            std::fs::write(&path, vec![b'v'; *size]).unwrap();
            path
        })
        .collect();

    let selection = FileSelection::from_paths(&paths).unwrap();
    (dir, selection)
}

/// Applies events until `done` holds, failing the test after a while.
pub async fn wait_until<F>(form: &mut UploadForm, done: F)
where
    F: Fn(&FormState) -> bool,
{
    let waiting = async {
        while !done(form.state()) {
            form.next_event().await;
        }
    };

    tokio::time::timeout(Duration::from_secs(10), waiting)
        .await
        .expect("form did not reach the expected state in time");
}

pub async fn settle(form: &mut UploadForm) {
    tokio::time::timeout(Duration::from_secs(10), form.run_until_settled())
        .await
        .expect("form did not settle in time");
}
