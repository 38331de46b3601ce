//! SVG flamegraph generation.
//!
//! Nodes are placed from their layout offsets: a node spans
//! `[offset, offset + num_samples)` of its thread's samples, scaled to the
//! canvas width. The root sits at the bottom. Every node group carries
//! `nav="up,left,down,right"` neighbour ids for keyboard navigation, where 0
//! (the root id) means there is no target.

use crate::aggregator::{CallTreeNode, ThreadStats, ThreadTree, ROOT_NODE_ID};
use crate::utils::config::{DEFAULT_SVG_WIDTH, SVG_FONT_SIZE, SVG_NODE_HEIGHT};
use crate::utils::error::FlamegraphError;
use clap::ValueEnum;
use log::{debug, info};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// How flamegraph nodes are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorScheme {
    /// Share of the thread's samples
    #[default]
    Hot,
    /// Hash of the module name
    Dso,
    /// Hash of the method name
    Legacy,
}

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
    pub color_scheme: ColorScheme,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Flamegraph Report".to_string(),
            width: DEFAULT_SVG_WIDTH,
            color_scheme: ColorScheme::Hot,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }
}

/// Capture details shown in the report header
#[derive(Debug, Clone, Default)]
pub struct ReportInfo {
    pub process_name: Option<String>,
    pub pid: Option<u32>,
    /// Preformatted report date
    pub date: String,
    pub record_cmd: Option<String>,
}

type Rgb = (u8, u8, u8);

/// Render one thread's call tree as an SVG document
///
/// Offsets must already be assigned with `generate_offsets`.
pub fn render_thread_svg(
    tree: &ThreadTree,
    config: &FlamegraphConfig,
) -> Result<String, FlamegraphError> {
    let root = &tree.root;
    let first = root.children().next().ok_or(FlamegraphError::EmptyTree)?;
    if root.num_samples == 0 {
        return Err(FlamegraphError::EmptyTree);
    }

    let width = config.width;
    let height = (root.max_depth() + 2) * SVG_NODE_HEIGHT;
    debug!(
        "Rendering thread {} ({} samples, depth {})",
        tree.tid,
        root.num_samples,
        root.max_depth()
    );

    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="{}" height="{}" style="border: 1px solid black;" rootid="{}">"#,
        width, height, first.id
    ));
    out.push_str(
        r##"<defs><linearGradient id="background_gradient" y1="0" y2="1" x1="0" x2="0"><stop stop-color="#eeeeee" offset="5%"/><stop stop-color="#efefb1" offset="90%"/></linearGradient></defs>"##,
    );
    out.push_str(&format!(
        r#"<rect x="0.0" y="0" width="{}" height="{}" fill="url(#background_gradient)"/>"#,
        width, height
    ));

    // Layout spans the sampled frames; shares are of every thread sample so
    // they agree with the thread summary.
    let renderer = Renderer {
        total: root.num_samples as f64,
        thread_total: tree.num_samples.max(root.num_samples) as f64,
        width: width as f64,
        height,
        scheme: config.color_scheme,
    };
    renderer.render_children(root, 0, &mut out);

    out.push_str("</svg>");
    Ok(out)
}

struct Renderer {
    total: f64,
    thread_total: f64,
    width: f64,
    height: usize,
    scheme: ColorScheme,
}

impl Renderer {
    fn render_children(&self, parent: &CallTreeNode, depth: usize, out: &mut String) {
        let siblings: Vec<&CallTreeNode> = parent.children().collect();
        for (i, node) in siblings.iter().enumerate() {
            let left = if i == 0 { ROOT_NODE_ID } else { siblings[i - 1].id };
            let right = siblings.get(i + 1).map_or(ROOT_NODE_ID, |n| n.id);
            let up = hottest_child(node).map_or(ROOT_NODE_ID, |n| n.id);
            let nav = [up, left, parent.id, right];

            self.render_node(node, depth, nav, out);
            self.render_children(node, depth + 1, out);
        }
    }

    fn render_node(&self, node: &CallTreeNode, depth: usize, nav: [u64; 4], out: &mut String) {
        let x = node.offset as f64 / self.total * self.width;
        let w = node.num_samples as f64 / self.total * self.width;
        if w <= 0.0 {
            return;
        }
        let y = self.height - depth * SVG_NODE_HEIGHT - SVG_NODE_HEIGHT;

        let (r, g, b) = self.color(node);
        let (br, bg, bb) = (r.saturating_sub(50), g.saturating_sub(50), b.saturating_sub(50));
        let method = escape_xml(&node.method);
        let label = get_truncated_name(&node.method, w).map(|l| escape_xml(&l)).unwrap_or_default();

        out.push_str(&format!(
            r#"<g id="{id}" class="n" nav="{n0},{n1},{n2},{n3}"><title>{method} | {module} ({samples} samples: {pct:3.2}%)</title><rect x="{x:.2}" y="{y}" ox="{x:.2}" oy="{y}" width="{w:.2}" owidth="{w:.2}" height="15.0" ofill="rgb({r},{g},{b})" fill="rgb({r},{g},{b})" style="stroke:rgb({br},{bg},{bb})"/><text x="{tx:.2}" y="{ty}" font-size="{fs}" font-family="Monospace">{label}</text></g>"#,
            id = node.id,
            n0 = nav[0],
            n1 = nav[1],
            n2 = nav[2],
            n3 = nav[3],
            method = method,
            module = escape_xml(&node.module),
            samples = node.num_samples,
            pct = self.share(node) * 100.0,
            x = x,
            y = y,
            w = w,
            r = r,
            g = g,
            b = b,
            br = br,
            bg = bg,
            bb = bb,
            tx = x + 2.0,
            ty = y + 12,
            fs = SVG_FONT_SIZE,
            label = label,
        ));
    }

    /// Share of all thread samples passing through `node`
    fn share(&self, node: &CallTreeNode) -> f64 {
        node.num_samples as f64 / self.thread_total
    }

    fn color(&self, node: &CallTreeNode) -> Rgb {
        match self.scheme {
            ColorScheme::Hot => heat_color(self.share(node)),
            ColorScheme::Dso => {
                let h = hash_to_float(&node.module);
                let hr = hash_to_float(&reversed(&node.module));
                (scale(170, 80, hr), scale(180, 70, h), scale(170, 80, hr))
            }
            ColorScheme::Legacy => {
                let h = hash_to_float(&node.method);
                let hr = hash_to_float(&reversed(&node.method));
                (scale(175, 50, hr), scale(60, 180, h), scale(60, 55, hr))
            }
        }
    }
}

/// Child with the most samples; the first one wins ties
fn hottest_child(node: &CallTreeNode) -> Option<&CallTreeNode> {
    node.children().fold(None, |best: Option<&CallTreeNode>, c| match best {
        Some(b) if b.num_samples >= c.num_samples => Some(b),
        _ => Some(c),
    })
}

/// Hotter (larger share) nodes are redder
fn heat_color(share: f64) -> Rgb {
    let cold = (1.0 - share).clamp(0.0, 1.0);
    (scale(245, 10, cold), scale(110, 105, cold), 100)
}

fn scale(base: u8, range: u8, factor: f64) -> u8 {
    (base as f64 + range as f64 * factor).round().min(255.0) as u8
}

fn hash_to_float(s: &str) -> f64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish() as f64 / u64::MAX as f64
}

fn reversed(s: &str) -> String {
    s.chars().rev().collect()
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Fit a node label into `width` pixels, or `None` if nothing sensible fits
pub fn get_truncated_name(name: &str, width: f64) -> Option<String> {
    const CHAR_WIDTH: f64 = 7.0;
    if width <= 35.0 {
        return None;
    }
    let max_chars = (width / CHAR_WIDTH) as usize;
    let len = name.chars().count();
    if len <= max_chars {
        Some(name.to_string())
    } else if max_chars > 3 {
        let head: String = name.chars().take(max_chars - 3).collect();
        Some(format!("{}...", head))
    } else {
        None
    }
}

/// Assemble an HTML report with one flamegraph per thread
///
/// `threads` should list the main thread first. Threads without frames are
/// listed with their sample count but no graph.
pub fn generate_report(
    threads: &[&ThreadTree],
    info: &ReportInfo,
    config: &FlamegraphConfig,
) -> String {
    let total_samples: u64 = threads.iter().map(|t| t.num_samples).sum();
    info!(
        "Generating flamegraph report for {} threads ({} samples)",
        threads.len(),
        total_samples
    );

    let mut out = String::new();
    out.push_str("<html><head><meta charset=\"utf-8\"/>");
    out.push_str(&format!("<title>{}</title>", escape_xml(&config.title)));
    out.push_str(
        r#"<style type="text/css"> .n { stroke:black; stroke-width:0.5; cursor:pointer; } </style>"#,
    );
    out.push_str("</head><body style='font-family: Monospace;'>");

    out.push_str(&format!(
        "<div style='display:inline-block;'><font size='8'>{}</font><br/><br/>",
        escape_xml(&config.title)
    ));
    if let (Some(name), Some(pid)) = (&info.process_name, info.pid) {
        out.push_str(&format!("Process : {} ({})<br/>", escape_xml(name), pid));
    }
    out.push_str(&format!(
        "Date&nbsp;&nbsp;&nbsp;&nbsp;: {}<br/>Threads : {}<br/>Samples : {}<br/>",
        escape_xml(&info.date),
        threads.len(),
        total_samples
    ));
    if let Some(cmd) = &info.record_cmd {
        out.push_str(&format!("Capture : {}<br/><br/>", escape_xml(cmd)));
    }
    out.push_str("</div>");

    for tree in threads {
        let label = if tree.is_main_thread() { "Main Thread" } else { "Thread" };
        out.push_str(&format!(
            "<br/><br/><b>{} {} ({}) ({} samples):</b><br/>\n",
            label,
            tree.tid,
            escape_xml(&tree.name),
            tree.num_samples
        ));
        match render_thread_svg(tree, config) {
            Ok(svg) => {
                out.push_str(&svg);
                out.push_str("<br/>\n");
            }
            Err(e) => debug!("Skipping graph for thread {}: {}", tree.tid, e),
        }
    }

    out.push_str("</body></html>");
    info!("Report generated successfully ({} bytes)", out.len());
    out
}

/// Create a text summary of per-thread statistics and hot frames
pub fn generate_text_summary(stats: &[ThreadStats], max_frames: usize) -> String {
    let mut lines = Vec::new();

    lines.push("  THREADS".to_string());
    lines.push(format!(
        "  {:>8}  {:<24} {:>10} {:>8} {:>6}",
        "TID", "NAME", "SAMPLES", "NODES", "DEPTH"
    ));
    for s in stats {
        lines.push(format!(
            "  {:>8}  {:<24} {:>10} {:>8} {:>6}",
            s.tid,
            truncate_left(&s.name, 24),
            s.num_samples,
            s.node_count,
            s.max_depth
        ));
    }

    for s in stats.iter().filter(|s| !s.hot_frames.is_empty()) {
        lines.push(String::new());
        lines.push(format!("  HOT FRAMES, thread {} ({})", s.tid, s.name));
        for frame in s.hot_frames.iter().take(max_frames) {
            let display = format!("{} (in {})", frame.method, frame.module);
            lines.push(format!(
                "  {:<60} {:>10} {:>6.1}%",
                truncate_left(&display, 60),
                frame.self_samples,
                frame.percentage
            ));
        }
    }

    lines.join("\n")
}

/// Keep the tail of long names, which carries the most specific part
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len - (max - 3)).collect();
        format!("...{}", tail)
    }
}
