//! # Summary Chart Module / 摘要图表模块
//!
//! Renders the run summary as a self-contained SVG pie chart: the split
//! between passed, failed and error rows, annotated with the IMEI, the
//! software version, the run duration and the tester.
//!
//! 将运行摘要渲染为独立的 SVG 饼图：通过、失败和错误行的比例，
//! 并标注 IMEI、软件版本、运行时长和测试人员。

use maud::{Markup, html};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::infra::t;
use crate::reporting::report::RunSummary;

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 600.0;
const CENTER_X: f64 = WIDTH / 2.0;
const CENTER_Y: f64 = 320.0;
const RADIUS: f64 = 170.0;

/// Slice colors for passed, failed and error rows.
pub const SLICE_COLORS: [&str; 3] = ["#4caf50", "#f44336", "#ff9800"];

/// Slice labels for passed, failed and error rows.
pub const SLICE_LABELS: [&str; 3] = ["Passed", "Failed", "Error_count"];

/// One drawable slice of the pie.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub color: &'static str,
    pub share: f64,
    start: f64,
    end: f64,
}

impl Slice {
    /// Whether the slice covers the whole disc (an SVG arc cannot draw that).
    pub fn is_full(&self) -> bool {
        self.share >= 0.9999
    }

    /// SVG path of the slice: center, arc, back to center.
    pub fn path(&self) -> String {
        let (x0, y0) = point_at(self.start, RADIUS);
        let (x1, y1) = point_at(self.end, RADIUS);
        let large_arc = if self.share > 0.5 { 1 } else { 0 };
        format!(
            "M {CENTER_X:.2} {CENTER_Y:.2} L {x0:.2} {y0:.2} A {RADIUS:.2} {RADIUS:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z"
        )
    }

    /// Position of the slice label, just outside the disc.
    pub fn label_point(&self) -> (f64, f64) {
        point_at(self.mid(), RADIUS * 1.15)
    }

    /// Position of the percentage, inside the slice.
    pub fn percent_point(&self) -> (f64, f64) {
        if self.is_full() {
            (CENTER_X, CENTER_Y)
        } else {
            point_at(self.mid(), RADIUS * 0.6)
        }
    }

    pub fn percent_text(&self) -> String {
        format!("{:.0}%", self.share * 100.0)
    }

    fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}

// Angles start at twelve o'clock and grow clockwise (SVG y axis points down).
fn point_at(angle: f64, radius: f64) -> (f64, f64) {
    (
        CENTER_X + radius * angle.cos(),
        CENTER_Y + radius * angle.sin(),
    )
}

/// Lays out the non-empty slices of the summary, in passed, failed, error order.
/// 按通过、失败、错误的顺序布局摘要中的非空扇区。
pub fn slices(summary: &RunSummary) -> Vec<Slice> {
    let mut start = -FRAC_PI_2;
    let mut out = Vec::with_capacity(3);
    for (i, share) in summary.shares().into_iter().enumerate() {
        if share <= 0.0 {
            continue;
        }
        let end = start + share * TAU;
        out.push(Slice {
            label: SLICE_LABELS[i],
            color: SLICE_COLORS[i],
            share,
            start,
            end,
        });
        start = end;
    }
    out
}

/// Renders the summary chart as inline SVG markup.
/// 将摘要图表渲染为内联 SVG 标记。
pub fn render_pie_chart(summary: &RunSummary, locale: &str) -> Markup {
    let slices = slices(summary);
    let view_box = format!("0 0 {} {}", num(WIDTH), num(HEIGHT));

    html! {
        svg xmlns="http://www.w3.org/2000/svg" class="summary-chart" width=(num(WIDTH)) height=(num(HEIGHT)) viewBox=(view_box) {
            text x=(num(CENTER_X)) y="36" text-anchor="middle" font-size="20" font-weight="bold" {
                (t!("chart.title", locale = locale).to_string())
            }
            text x=(num(CENTER_X)) y="66" text-anchor="middle" font-size="15" {
                (t!("chart.imei", locale = locale, imei = &summary.imei).to_string())
            }
            text x=(num(CENTER_X)) y="90" text-anchor="middle" font-size="15" {
                (t!("chart.version", locale = locale, version = &summary.version_info).to_string())
            }
            text x=(num(CENTER_X)) y="114" text-anchor="middle" font-size="15" {
                (t!("chart.duration", locale = locale, duration = summary.formatted_duration()).to_string())
            }
            @if slices.is_empty() {
                circle cx=(num(CENTER_X)) cy=(num(CENTER_Y)) r=(num(RADIUS)) fill="#e0e0e0" {}
                text x=(num(CENTER_X)) y=(num(CENTER_Y)) text-anchor="middle" font-size="15" {
                    (t!("chart.empty", locale = locale).to_string())
                }
            }
            @for slice in &slices {
                @if slice.is_full() {
                    circle cx=(num(CENTER_X)) cy=(num(CENTER_Y)) r=(num(RADIUS)) fill=(slice.color) {}
                } @else {
                    path d=(slice.path()) fill=(slice.color) stroke="#ffffff" stroke-width="1" {}
                }
            }
            @for slice in &slices {
                @let label_at = slice.label_point();
                @let percent_at = slice.percent_point();
                text x=(num(label_at.0)) y=(num(label_at.1)) text-anchor="middle" font-size="14" {
                    (slice.label)
                }
                text x=(num(percent_at.0)) y=(num(percent_at.1)) text-anchor="middle" font-size="14" fill="#ffffff" {
                    (slice.percent_text())
                }
            }
            text x=(num(CENTER_X)) y=(num(HEIGHT - 24.0)) text-anchor="middle" font-size="17" {
                (t!("chart.tested_by", locale = locale, tester = &summary.tester_name).to_string())
            }
        }
    }
}
