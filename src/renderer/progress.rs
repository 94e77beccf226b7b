use crate::core::watermark::Watermark;

/// Inner width of the framed dialog.
pub const BOX_WIDTH: usize = 64;
pub const PROGRESSBAR_LENGTH: usize = 57;

// Slots shown per dialog row
const SLOT_ROWS: [std::ops::Range<usize>; 3] = [0..12, 12..24, 24..32];

fn border() -> String {
    format!("  {}\n", ":".repeat(BOX_WIDTH + 4))
}

fn line(content: &str) -> String {
    format!("  ::{:^width$}::\n", content, width = BOX_WIDTH)
}

fn dialog(body: &[String]) -> String {
    let mut out = String::from("\n");
    out.push_str(&border());
    out.push_str(&border());
    for row in body {
        out.push_str(&line(row));
    }
    out.push_str(&border());
    out.push_str(border().trim_end());
    out
}

fn slot_label(slot: Option<u8>) -> String {
    match slot {
        Some(v) => format!("{:<2}", v),
        None => "??".to_string(),
    }
}

pub fn progress_bar(filled: usize, total: usize) -> String {
    let done = if total == 0 { 0 } else { (filled * PROGRESSBAR_LENGTH / total).min(PROGRESSBAR_LENGTH) };
    format!("{}{}", "|".repeat(done), " ".repeat(PROGRESSBAR_LENGTH - done))
}

/// Dialog showing every slot and overall progress.
pub fn render_progress(watermark: &Watermark) -> String {
    let slots = watermark.slots();
    let mut body = vec![String::new(), "DECODING MESSAGE...".to_string(), String::new(), String::new()];

    for range in SLOT_ROWS {
        let labels: Vec<String> = slots
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(|s| slot_label(*s))
            .collect();
        body.push(labels.join("   "));
    }

    body.extend([String::new(), String::new(), String::new()]);
    body.push(progress_bar(watermark.filled(), watermark.capacity()));
    body.extend([String::new(), String::new()]);
    dialog(&body)
}

/// Dialog shown once the message has been written.
pub fn render_success(output_name: &str) -> String {
    let mut body = vec![String::new(), "MESSAGE DECODED SUCCESSFULLY!".to_string()];
    body.extend(std::iter::repeat(String::new()).take(5));
    body.push(format!("Saved to {}", output_name));
    body.extend([String::new(), String::new()]);
    body.push(progress_bar(1, 1));
    body.extend([String::new(), String::new()]);
    dialog(&body)
}
