use crate::common::{Emitter, FileSelection, UploadAccepted, VidupError, VidupResult, PART_NAME};
use crate::config::ClientConfig;
use crate::native::file::{CountingFile, UploadCounter};
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use tokio::fs::File;

/// Sends a whole selection as one multipart request.
#[derive(Debug, Clone)]
pub struct UploadController {
    client: reqwest::Client,
    url: Url,
    emitter: Emitter,
}

impl UploadController {
    pub fn new(client: reqwest::Client, config: &ClientConfig, emitter: Emitter) -> VidupResult<Self> {
        Ok(Self {
            client,
            url: config.process_url()?,
            emitter,
        })
    }

    /// Posts every file under the shared `file` field.
    ///
    /// `Event::UploadProgress` is emitted each time the transport pulls another
    /// chunk of file data. An empty selection still sends a (partless) request.
    pub async fn submit(&self, files: &FileSelection) -> VidupResult<UploadAccepted> {
        let mut opened = Vec::with_capacity(files.len());
        let mut total = 0;

        for selected in files {
            let file = File::open(&selected.path).await?;
            let size = file.metadata().await?.len();
            total += size;
            opened.push((selected.name.clone(), file, size));
        }

        let counter = UploadCounter::new(total, self.emitter.clone());

        let mut form = Form::new();
        for (name, file, size) in opened {
            let body = Body::wrap_stream(CountingFile::new(file, counter.clone()));
            let part = Part::stream_with_length(body, size)
                .file_name(name)
                .mime_str("application/octet-stream")?;
            form = form.part(PART_NAME, part);
        }

        debug!(
            "uploading {} file(s), {} bytes to {}",
            files.len(),
            total,
            self.url
        );

        let resp = self
            .client
            .post(self.url.clone())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VidupError::Status { status, body });
        }

        Ok(resp.json().await?)
    }
}
