use chrono::{Datelike, NaiveDate};
use htmlescape::{encode_attribute, encode_minimal};
use std::collections::BTreeMap;

use crate::time::month_days;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Render the calendar page for the month containing `month`.
///
/// Each week is a table row led by the date of its first shown day. A day
/// present in `charts` gets an `<img>` pointing at the mapped path; any
/// other day gets an empty cell.
pub fn render_month(
    month: NaiveDate,
    charts: &BTreeMap<NaiveDate, String>,
    title: &str,
) -> String {
    let mut html = String::new();
    html.push_str("<html>\n<head>\n");
    html.push_str(&format!("<title>{}</title>\n", encode_minimal(title)));
    html.push_str(
        "<style>\n\
         body { font-family: DejaVuSans, sans-serif; }\n\
         th { font-weight: normal; text-align: center; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n<table>\n<tr>\n<th></th>\n");
    for name in WEEKDAYS {
        html.push_str(&format!("<th>{}</th>\n", name));
    }
    html.push_str("</tr>\n");

    let days = month_days(month);
    for (i, day) in days.iter().enumerate() {
        let weekday = day.weekday().num_days_from_monday();
        if i == 0 || weekday == 0 {
            html.push_str(&format!("<tr>\n<td>{}</td>\n", day.format("%d/%m/%Y")));
            if i == 0 {
                for _ in 0..weekday {
                    html.push_str("<td/>\n");
                }
            }
        }

        match charts.get(day) {
            Some(src) => html.push_str(&format!(
                "<td><img src=\"{}\"/></td>\n",
                encode_attribute(src)
            )),
            None => html.push_str("<td></td>\n"),
        }

        if weekday == 6 || i + 1 == days.len() {
            html.push_str("</tr>\n");
        }
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
