//! Server-side HTML rendering for the single demo page.
//!
//! Everything here is a pure function from data to markup so the display
//! logic can be tested without a running server.

use crate::content::ContentSelection;
use crate::ranking::RankedLabel;
use crate::video;

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f7fa; color: #1f2933; }
main { max-width: 1100px; margin: 0 auto; padding: 24px; }
h1 { color: #1e88e5; text-align: center; font-weight: 800; letter-spacing: -0.5px; }
h2 { font-size: 1.2rem; margin: 24px 0 12px; }
.columns { display: flex; gap: 20px; flex-wrap: wrap; }
.columns > section { flex: 1 1 380px; }
.preview img { width: 100%; border-radius: 12px; display: block; }
.prediction-box { background: #e3f2fd; border: 2px solid #1e88e5; border-radius: 12px; padding: 22px; text-align: center; margin: 16px 0; }
.prediction-box h2 { color: #0d47a1; margin: 0; font-size: 2rem; }
.prob-card { background: #fff; border-radius: 10px; padding: 12px 14px; margin: 10px 0; }
.prob-card .row { display: flex; justify-content: space-between; margin-bottom: 6px; }
.bar-track { background: #eceff1; border-radius: 6px; width: 100%; height: 22px; overflow: hidden; }
.bar-fill { background: #4caf50; height: 100%; border-radius: 6px; transition: width .5s; }
.bar-fill.highlight { background: #ff6f00; }
.card { border: 1px solid #e3e6ea; border-radius: 12px; padding: 14px; background: #fff; margin: 10px 0; }
.card h4 { margin: 0 0 10px; font-size: 1.05rem; color: #0d47a1; }
.thumb { width: 100%; height: auto; border-radius: 10px; display: block; }
.thumb-wrap { position: relative; display: block; }
.play-badge { position: absolute; top: 50%; left: 50%; transform: translate(-50%,-50%); width: 60px; height: 60px; border-radius: 50%; background: rgba(0,0,0,.55); }
.play-badge:after { content: ''; border-style: solid; border-width: 12px 0 12px 20px; border-color: transparent transparent transparent #fff; position: absolute; top: 50%; left: 50%; transform: translate(-40%,-50%); }
.helper { color: #607d8b; font-size: .9rem; }
.helper-note { background: #e3f2fd; border-radius: 10px; padding: 14px; color: #37474f; }
.error-banner { background: #ffebee; border: 2px solid #c62828; border-radius: 10px; padding: 14px; color: #b71c1c; }
.uploader { border: 2px dashed #1e88e5; border-radius: 12px; padding: 16px; background: #f5fafe; margin: 10px 0; }
.tabs button { border: none; background: #eceff1; padding: 8px 16px; border-radius: 8px 8px 0 0; cursor: pointer; }
.tabs button.active { background: #1e88e5; color: #fff; }
select { padding: 6px 10px; border-radius: 8px; }
video, canvas { width: 100%; border-radius: 12px; }
"#;

const CAPTURE_SCRIPT: &str = r#"
const tabs = document.querySelectorAll('.tabs button');
tabs.forEach(btn => btn.addEventListener('click', () => {
  tabs.forEach(b => b.classList.remove('active'));
  btn.classList.add('active');
  document.getElementById('upload-pane').hidden = btn.dataset.pane !== 'upload-pane';
  document.getElementById('camera-pane').hidden = btn.dataset.pane !== 'camera-pane';
}));

let stream = null;
const videoEl = document.getElementById('camera-feed');
document.getElementById('camera-start').addEventListener('click', async () => {
  stream = await navigator.mediaDevices.getUserMedia({ video: true });
  videoEl.srcObject = stream;
  await videoEl.play();
  document.getElementById('camera-snap').disabled = false;
});
document.getElementById('camera-snap').addEventListener('click', () => {
  const canvas = document.createElement('canvas');
  canvas.width = videoEl.videoWidth;
  canvas.height = videoEl.videoHeight;
  canvas.getContext('2d').drawImage(videoEl, 0, 0);
  canvas.toBlob(async blob => {
    const form = new FormData();
    form.append('image', blob, 'snapshot.jpg');
    const response = await fetch('/classify', { method: 'POST', body: form });
    window.location = response.redirected ? response.url : '/';
  }, 'image/jpeg', 0.92);
});
"#;

/// Wraps a body fragment in the full page shell.
pub fn page(body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Lookbook</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n\
         <h1>Lookbook &mdash; what does the model see?</h1>\n{}\n</main>\n\
         <script>{}</script>\n</body>\n</html>\n",
        STYLES, body, CAPTURE_SCRIPT
    )
}

/// The camera/upload input area, always shown at the top of the page.
pub fn input_form() -> String {
    r#"<div class="tabs">
  <button type="button" class="active" data-pane="camera-pane">&#128247; Camera</button>
  <button type="button" data-pane="upload-pane">&#128193; Upload</button>
</div>
<div id="camera-pane" class="uploader">
  <video id="camera-feed" muted playsinline></video>
  <button type="button" id="camera-start">Start camera</button>
  <button type="button" id="camera-snap" disabled>Take snapshot</button>
</div>
<div id="upload-pane" class="uploader" hidden>
  <form method="post" action="/classify" enctype="multipart/form-data">
    <input type="file" name="image" accept="image/jpeg,image/png,image/webp,image/tiff,image/gif,image/bmp" required>
    <button type="submit">Analyze</button>
  </form>
</div>
"#
    .to_string()
}

/// Shown when no image has been submitted yet.
pub fn landing_hint() -> String {
    r#"<div class="helper-note">Take a snapshot or upload an image and the predicted label, per-label probabilities and curated content will appear here.</div>"#.to_string()
}

pub fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="error-banner">{}</div>"#,
        escape_html(message)
    )
}

pub fn prediction_banner(label: &str) -> String {
    format!(
        r#"<div class="prediction-box"><span class="helper">Prediction:</span><h2>{}</h2><div class="helper">Curated content for the predicted label appears in the right panel.</div></div>"#,
        escape_html(label)
    )
}

/// One bar per label, widest first. The bar for the predicted label is
/// highlighted; widths are proportional to probability and the printed
/// percentage keeps two decimal places.
pub fn probability_bars(ranked: &[RankedLabel], predicted: &str) -> String {
    let mut out = String::from("<h2>Per-label probabilities</h2>\n");
    for entry in ranked {
        let highlight = if entry.label == predicted { " highlight" } else { "" };
        out.push_str(&format!(
            r#"<div class="prob-card"><div class="row"><strong>{}</strong><span>{:.2}%</span></div><div class="bar-track"><div class="bar-fill{}" style="width:{:.4}%;"></div></div></div>"#,
            escape_html(&entry.label),
            entry.percentage(),
            highlight,
            entry.percentage(),
        ));
        out.push('\n');
    }
    out
}

/// The label dropdown above the content panel. Submitting the form reloads
/// the page with `?label=...`; the predicted label stays the default.
pub fn label_picker(labels: &[String], selected: &str) -> String {
    let mut options = String::new();
    for label in labels {
        let flag = if label == selected { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape_html(label),
            flag
        ));
    }
    format!(
        r#"<form method="get" action="/"><label class="helper">Show content for </label><select name="label" onchange="this.form.submit()">{}</select></form>"#,
        options
    )
}

/// The curated content for one label: text cards, up to three images, up to
/// three video thumbnails (or plain links when no thumbnail can be derived).
pub fn content_panel(label: &str, selection: &ContentSelection) -> String {
    let mut out = String::from("<h2>Curated content</h2>\n");

    if selection.is_empty() {
        out.push_str(&format!(
            r#"<div class="helper-note">No curated content for <code>{}</code> yet. Add an entry to the content registry file to fill this panel.</div>"#,
            escape_html(label)
        ));
        return out;
    }

    for text in &selection.texts {
        out.push_str(&format!(
            r#"<div class="card"><h4>Text</h4><div>{}</div></div>"#,
            escape_html(text)
        ));
        out.push('\n');
    }

    for url in &selection.images {
        out.push_str(&format!(
            r#"<div class="card"><h4>Image</h4><img src="{}" class="thumb" loading="lazy"></div>"#,
            escape_html(url)
        ));
        out.push('\n');
    }

    for url in &selection.videos {
        match video::thumbnail_url(url) {
            Some(thumb) => out.push_str(&format!(
                r#"<div class="card"><h4>Video</h4><a href="{0}" target="_blank" class="thumb-wrap"><img src="{1}" class="thumb" loading="lazy"><div class="play-badge"></div></a><div class="helper">{0}</div></div>"#,
                escape_html(url),
                escape_html(&thumb)
            )),
            None => out.push_str(&format!(
                r#"<div class="card"><h4>Video</h4><a href="{0}" target="_blank">{0}</a></div>"#,
                escape_html(url)
            )),
        }
        out.push('\n');
    }

    out
}

/// Assembles the full results layout: preview and banner on top, probability
/// bars on the left, label picker and content panel on the right.
pub fn results_section(
    predicted: &str,
    ranked: &[RankedLabel],
    labels: &[String],
    selected: &str,
    selection: &ContentSelection,
) -> String {
    format!(
        r#"<div class="columns">
<section class="preview"><img src="/preview" alt="submitted image"></section>
<section>{}</section>
</div>
<div class="columns">
<section>{}</section>
<section>{}{}</section>
</div>"#,
        prediction_banner(predicted),
        probability_bars(ranked, predicted),
        label_picker(labels, selected),
        content_panel(selected, selection),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
