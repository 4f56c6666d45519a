use vidup::FormState;

const BAR_WIDTH: usize = 30;

pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * BAR_WIDTH / 100;

    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Lines to show for `state`, mirroring what the upload page displays.
pub fn render(state: &FormState) -> Vec<String> {
    let mut lines = Vec::new();

    if state.upload_progress() > 0 {
        lines.push(format!(
            "Upload Progress {}",
            progress_bar(state.upload_progress())
        ));
    }

    if let Some(error) = state.upload_error() {
        lines.push(format!("Upload failed: {}", error));
    }

    if let Some(message) = state.processing_message() {
        lines.push(message.to_string());

        if let Some(status) = state.task_status() {
            lines.push(format!("Task Status: {}", status));
        }

        if state.task_progress() > 0 {
            lines.push(format!(
                "Processing Progress {}",
                progress_bar(state.task_progress())
            ));
        }
    }

    lines
}
