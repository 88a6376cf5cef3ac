use crate::map::Popup;
use crate::types::{Metrics, Workout};
use crate::utils::{format_fixed1, format_number};
use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

pub const POPUP_MAX_WIDTH: u32 = 500;
pub const POPUP_MIN_WIDTH: u32 = 100;

/// Popup for a workout marker: stays open when other popups open or the map is clicked.
pub fn workout_popup(w: &Workout) -> Popup {
    let kind = w.kind();
    Popup {
        max_width: POPUP_MAX_WIDTH,
        min_width: POPUP_MIN_WIDTH,
        auto_close: false,
        close_on_click: false,
        class_name: Some(format!("{kind}-popup")),
        content: format!("{} {}", kind.icon(), w.description),
    }
}

/// HTML list row for a workout, correlated through `data-id`.
pub fn workout_row_html(w: &Workout) -> Result<String> {
    let kind = w.kind();
    let mut xml = Writer::new(Vec::new());

    let mut li = BytesStart::new("li");
    li.push_attribute(("class", format!("workout workout--{kind}").as_str()));
    li.push_attribute(("data-id", w.id.as_str()));
    xml.write_event(Event::Start(li))?;

    text_element(&mut xml, "h2", "workout__title", &w.description)?;
    detail(&mut xml, kind.icon(), &format_number(w.distance), "km")?;
    detail(&mut xml, "⏱", &format_number(w.duration), "min")?;

    match w.metrics {
        Metrics::Running { cadence, pace } => {
            detail(&mut xml, "⚡️", &format_fixed1(pace), "min/km")?;
            detail(&mut xml, "🦶🏼", &format_number(cadence), "spm")?;
        }
        Metrics::Cycling {
            elevation_gain,
            speed,
        } => {
            detail(&mut xml, "⚡️", &format_fixed1(speed), "km/h")?;
            detail(&mut xml, "⛰", &format_number(elevation_gain), "m")?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("li")))?;

    String::from_utf8(xml.into_inner()).context("rendered workout row is not UTF-8")
}

/// One tab-separated line per workout for terminal listings.
pub fn summary_line(w: &Workout) -> String {
    let metric = match w.metrics {
        Metrics::Running { cadence, pace } => format!(
            "{} min/km\t{} spm",
            format_fixed1(pace),
            format_number(cadence)
        ),
        Metrics::Cycling {
            elevation_gain,
            speed,
        } => format!(
            "{} km/h\t{} m",
            format_fixed1(speed),
            format_number(elevation_gain)
        ),
    };
    format!(
        "{}\t{}\t{} km\t{} min\t{metric}",
        w.id,
        w.description,
        format_number(w.distance),
        format_number(w.duration)
    )
}

fn detail(xml: &mut Writer<Vec<u8>>, icon: &str, value: &str, unit: &str) -> Result<()> {
    open(xml, "div", "workout__details")?;
    text_element(xml, "span", "workout__icon", icon)?;
    text_element(xml, "span", "workout__value", value)?;
    text_element(xml, "span", "workout__unit", unit)?;
    xml.write_event(Event::End(BytesEnd::new("div")))?;
    Ok(())
}

fn text_element(xml: &mut Writer<Vec<u8>>, tag: &str, class: &str, text: &str) -> Result<()> {
    open(xml, tag, class)?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn open(xml: &mut Writer<Vec<u8>>, tag: &str, class: &str) -> Result<()> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("class", class));
    xml.write_event(Event::Start(start))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coords, WorkoutId};
    use chrono::{Local, TimeZone};

    fn running() -> Workout {
        let date = Local.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).single().unwrap();
        Workout::running(
            WorkoutId::new("1710417600000"),
            date,
            Coords::new(10.0, 20.0),
            5.0,
            32.0,
            150.0,
        )
    }

    fn cycling() -> Workout {
        let date = Local.with_ymd_and_hms(2024, 7, 2, 12, 0, 0).single().unwrap();
        Workout::cycling(
            WorkoutId::new("42"),
            date,
            Coords::new(0.0, 0.0),
            27.5,
            95.0,
            523.0,
        )
    }

    #[test]
    fn popup_is_sticky_and_typed() {
        let p = workout_popup(&running());
        assert_eq!(p.max_width, 500);
        assert_eq!(p.min_width, 100);
        assert!(!p.auto_close);
        assert!(!p.close_on_click);
        assert_eq!(p.class_name.as_deref(), Some("running-popup"));
        assert_eq!(p.content, "🏃‍♂️ Running on March 14");

        let p = workout_popup(&cycling());
        assert_eq!(p.class_name.as_deref(), Some("cycling-popup"));
        assert!(p.content.starts_with("🚴‍♀️ "));
    }

    #[test]
    fn running_row_has_pace_and_cadence() {
        let html = workout_row_html(&running()).unwrap();
        assert!(html.starts_with(
            r#"<li class="workout workout--running" data-id="1710417600000">"#
        ));
        assert!(html.contains(r#"<h2 class="workout__title">Running on March 14</h2>"#));
        assert!(html.contains(r#"<span class="workout__value">5</span><span class="workout__unit">km</span>"#));
        assert!(html.contains(r#"<span class="workout__value">32</span><span class="workout__unit">min</span>"#));
        assert!(html.contains(r#"<span class="workout__value">6.4</span><span class="workout__unit">min/km</span>"#));
        assert!(html.contains(r#"<span class="workout__value">150</span><span class="workout__unit">spm</span>"#));
        assert!(html.ends_with("</li>"));
    }

    #[test]
    fn cycling_row_has_speed_and_elevation() {
        let html = workout_row_html(&cycling()).unwrap();
        assert!(html.contains("workout--cycling"));
        assert!(html.contains(r#"<span class="workout__value">27.5</span>"#));
        assert!(html.contains(r#"<span class="workout__value">17.4</span><span class="workout__unit">km/h</span>"#));
        assert!(html.contains(r#"<span class="workout__value">523</span><span class="workout__unit">m</span>"#));
        assert!(!html.contains("spm"));
    }

    #[test]
    fn row_text_is_escaped() {
        let mut w = running();
        w.description = "<b>Running</b> & more".into();
        let html = workout_row_html(&w).unwrap();
        assert!(html.contains("&lt;b&gt;Running&lt;/b&gt; &amp; more"));
    }

    #[test]
    fn summary_line_is_tab_separated() {
        assert_eq!(
            summary_line(&running()),
            "1710417600000\tRunning on March 14\t5 km\t32 min\t6.4 min/km\t150 spm"
        );
        assert_eq!(
            summary_line(&cycling()),
            "42\tCycling on July 2\t27.5 km\t95 min\t17.4 km/h\t523 m"
        );
    }
}
