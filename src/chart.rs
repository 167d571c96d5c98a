use super::error::{GvError, Result};
use super::{min_and_max, GvSampling, HEIGHT, WIDTH};
use plotters::prelude::*;

pub const CRIMSON: RGBColor = RGBColor(220, 20, 60);
pub const MAROON: RGBColor = RGBColor(128, 0, 0);
pub const GREY: RGBColor = RGBColor(128, 128, 128);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    Circle,
    Triangle,
    Cross,
    Diamond,
    Square,
}

/// One plotted column: markers joined by a line, broken at missing values.
pub struct SeriesSpec {
    pub label: Option<&'static str>,
    pub values: fn(&GvSampling) -> Vec<f64>,
    pub color: RGBColor,
    pub marker: Marker,
}

pub struct PanelSpec {
    pub title: &'static str,
    pub y_desc: &'static str,
    pub y_from_zero: bool,
    pub series: Vec<SeriesSpec>,
}

fn counts(v: &[Option<i64>]) -> Vec<f64> {
    v.iter()
        .map(|c| c.map(|c| c as f64).unwrap_or(f64::NAN))
        .collect()
}

fn series(
    label: Option<&'static str>,
    values: fn(&GvSampling) -> Vec<f64>,
    color: RGBColor,
    marker: Marker,
) -> SeriesSpec {
    SeriesSpec {
        label,
        values,
        color,
        marker,
    }
}

/// The panels of the column plot, top to bottom.
pub fn panels() -> Vec<PanelSpec> {
    vec![
        PanelSpec {
            title: "Time delta",
            y_desc: "Time interval (s)",
            y_from_zero: true,
            series: vec![series(None, |s| s.delta_time_s.clone(), BLACK, Marker::Circle)],
        },
        PanelSpec {
            title: "Volumes",
            y_desc: "Volume (m^3)",
            y_from_zero: false,
            series: vec![
                series(Some("Vg"), |s| s.vg_m3.clone(), RED, Marker::Circle),
                series(Some("Vm"), |s| s.vm_m3.clone(), GREEN, Marker::Circle),
                series(Some("Vb"), |s| s.vb_m3.clone(), BLUE, Marker::Circle),
            ],
        },
        PanelSpec {
            title: "Delta volumes",
            y_desc: "Delta volume (m^3)",
            y_from_zero: false,
            series: vec![
                series(Some("delta Vg"), |s| s.delta_vg_m3.clone(), RED, Marker::Circle),
                series(Some("delta Vm"), |s| s.delta_vm_m3.clone(), GREEN, Marker::Circle),
                series(Some("delta Vb"), |s| s.delta_vb_m3.clone(), BLUE, Marker::Circle),
            ],
        },
        PanelSpec {
            title: "Reeds counts",
            y_desc: "Counts (adim. natural)",
            y_from_zero: false,
            series: vec![
                series(Some("reed 1"), |s| counts(&s.pulses_reed_1), CRIMSON, Marker::Triangle),
                series(Some("reed 2"), |s| counts(&s.pulses_reed_2), MAROON, Marker::Cross),
            ],
        },
        PanelSpec {
            title: "Delta reeds counts",
            y_desc: "Delta counts (adim. natural)",
            y_from_zero: false,
            series: vec![
                series(
                    Some("delta reed 1"),
                    |s| counts(&s.delta_pulses_reed_1),
                    CRIMSON,
                    Marker::Triangle,
                ),
                series(
                    Some("delta reed 2"),
                    |s| counts(&s.delta_pulses_reed_2),
                    MAROON,
                    Marker::Cross,
                ),
            ],
        },
        PanelSpec {
            title: "Flow rate",
            y_desc: "Flow rate (m^3/h)",
            y_from_zero: false,
            series: vec![series(None, |s| s.q_m3h.clone(), BLACK, Marker::Diamond)],
        },
        PanelSpec {
            title: "Integral flow",
            y_desc: "Flow (m^3)",
            y_from_zero: false,
            series: vec![series(None, |s| s.integral_q_m3.clone(), GREY, Marker::Square)],
        },
    ]
}

/// largest magnitude kept on an axis, so that the span stays finite
const AXIS_LIMIT: f64 = 1e300;

/// pads the span by 1/divisor on each side; an empty span gets at least one unit
fn padded(min: f64, max: f64, divisor: f64) -> (f64, f64) {
    let min = min.clamp(-AXIS_LIMIT, AXIS_LIMIT);
    let max = max.clamp(-AXIS_LIMIT, AXIS_LIMIT);
    let margin = (max - min) / divisor;
    if margin > 0. {
        (min - margin, max + margin)
    } else {
        let margin = (max.abs() / divisor).max(1.);
        (min - margin, max + margin)
    }
}

/// x range shared by all the panels
pub fn x_range(s: &GvSampling) -> (f64, f64) {
    match min_and_max(&s.time_s) {
        Some((min, max)) => padded(min, max, 20.),
        None => (0., 1.),
    }
}

/// y range covering all the series of the panel
pub fn y_range(s: &GvSampling, panel: &PanelSpec) -> (f64, f64) {
    let all: Vec<f64> = panel.series.iter().flat_map(|p| (p.values)(s)).collect();
    let (ymin, ymax) = match min_and_max(&all) {
        Some((min, max)) => padded(min, max, 10.),
        None => (0., 1.),
    };
    if panel.y_from_zero {
        (0., if ymax > 0. { ymax } else { 1. })
    } else {
        (ymin, ymax)
    }
}

/// plots one panel to svg
pub fn render_panel(
    s: &GvSampling,
    panel: &PanelSpec,
    xrange: (f64, f64),
) -> std::result::Result<String, Box<dyn std::error::Error>> {
    let (ymin, ymax) = y_range(s, panel);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(panel.title, ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(xrange.0..xrange.1, ymin..ymax)?;
        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(220, 220, 220).stroke_width(1))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 14))
            .x_desc("Time (s)")
            .y_desc(panel.y_desc)
            .draw()?;

        for spec in panel.series.iter() {
            let values = (spec.values)(s);
            let points: Vec<(f64, f64)> = s.time_s.iter().copied().zip(values).collect();
            let plottable = |(x, y): &(f64, f64)| x.is_finite() && y.is_finite();
            for chunk in points.split(|p| !plottable(p)) {
                if chunk.is_empty() {
                    continue;
                }
                chart.draw_series(LineSeries::new(
                    chunk.iter().copied(),
                    spec.color.stroke_width(1),
                ))?;
            }

            let valid = points.iter().copied().filter(|p| plottable(p));
            let style = spec.color.filled();
            let anno = match spec.marker {
                Marker::Circle => chart.draw_series(valid.map(|c| Circle::new(c, 3, style)))?,
                Marker::Triangle => {
                    chart.draw_series(valid.map(|c| TriangleMarker::new(c, 4, style)))?
                }
                Marker::Cross => chart.draw_series(
                    valid.map(|c| Cross::new(c, 4, spec.color.stroke_width(2))),
                )?,
                Marker::Diamond => chart.draw_series(valid.map(|c| {
                    EmptyElement::at(c)
                        + Polygon::new(vec![(0, -4), (4, 0), (0, 4), (-4, 0)], style)
                }))?,
                Marker::Square => chart.draw_series(
                    valid.map(|c| EmptyElement::at(c) + Rectangle::new([(-3, -3), (3, 3)], style)),
                )?,
            };
            if let Some(label) = spec.label {
                let color = spec.color;
                anno.label(label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }

        if panel.series.iter().any(|p| p.label.is_some()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(("sans-serif", 14))
                .draw()?;
        }
        root.present()?;
    }
    Ok(svg)
}

/// plots all the panels with a shared x range
pub fn render_column(s: &GvSampling) -> Result<Vec<String>> {
    let xrange = x_range(s);
    panels()
        .iter()
        .map(|panel| {
            tracing::debug!(panel = panel.title, "rendering panel");
            render_panel(s, panel, xrange).map_err(|e| GvError::Render(e.to_string()))
        })
        .collect()
}
