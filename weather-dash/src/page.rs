//! The dashboard page. Layout and controls live here; every number on it comes
//! from `/api/dashboard`.

use weather_dash_core::{
    Metric,
    dashboard::TITLE,
    window::{DEFAULT_HOURS, MAX_HOURS, MIN_HOURS},
};

/// Step between labelled slider marks.
const MARK_STEP: usize = 12;

pub fn render(refresh_ms: u64) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", TITLE)
        .replace("{{METRIC_OPTIONS}}", &metric_options())
        .replace("{{SLIDER_MARKS}}", &slider_marks())
        .replace("{{MIN_HOURS}}", &MIN_HOURS.to_string())
        .replace("{{MAX_HOURS}}", &MAX_HOURS.to_string())
        .replace("{{DEFAULT_HOURS}}", &DEFAULT_HOURS.to_string())
        .replace("{{REFRESH_MS}}", &refresh_ms.to_string())
}

fn metric_options() -> String {
    Metric::all()
        .iter()
        .map(|m| {
            let selected = if *m == Metric::default() { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, m.as_str(), m.label())
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

/// Marks at 1h, 13h, 25h, ... up to the last one below the maximum.
fn slider_marks() -> String {
    (MIN_HOURS as usize..MAX_HOURS as usize)
        .step_by(MARK_STEP)
        .map(|h| format!(r#"<option value="{h}" label="{h}h"></option>"#))
        .collect::<Vec<_>>()
        .join("")
}

const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Weather Dashboard</title>
  <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
  <style>
    body { font-family: Arial, sans-serif; background-color: #f2f2f2; padding: 20px; margin: 0; }
    h1 { text-align: center; color: #004466; }
    .line { text-align: center; margin: 20px; font-size: 18px; }
    .control { width: 50%; margin: auto; padding: 10px; }
    .control select, .control input { width: 100%; }
    .hours-value { text-align: center; font-size: 14px; }
    .error { display: none; margin: 10px auto; width: 80%; padding: 10px;
             background: #fdecea; color: #8a1c1c; border: 1px solid #f5c2c0; white-space: pre-wrap; }
    .chart { background: #fff; margin: 10px 0; min-height: 420px; }
  </style>
</head>
<body>
  <h1>{{TITLE}}</h1>

  <div id="error" class="error"></div>
  <div id="current-weather" class="line"></div>
  <div id="weather-summary" class="line"></div>

  <div class="control">
    <select id="metric-dropdown">
          {{METRIC_OPTIONS}}
    </select>
  </div>

  <div class="control" style="padding: 20px;">
    <input id="hour-slider" type="range" min="{{MIN_HOURS}}" max="{{MAX_HOURS}}" step="1"
           value="{{DEFAULT_HOURS}}" list="hour-marks">
    <datalist id="hour-marks">{{SLIDER_MARKS}}</datalist>
    <div id="hour-value" class="hours-value">{{DEFAULT_HOURS}}h</div>
  </div>

  <div id="weather-bar-chart" class="chart"></div>
  <div id="weather-line-chart" class="chart"></div>
  <div id="weather-pie-chart" class="chart"></div>
  <div id="correlation-matrix" class="chart"></div>

  <script>
    const REFRESH_MS = {{REFRESH_MS}};
    const dropdown = document.getElementById('metric-dropdown');
    const slider = document.getElementById('hour-slider');
    const hourValue = document.getElementById('hour-value');
    const errorBox = document.getElementById('error');
    let ticks = 0;
    let pending = null;

    async function update(trigger) {
      const params = new URLSearchParams({
        metric: dropdown.value,
        hours: slider.value,
        trigger: trigger,
        n: String(ticks),
      });

      try {
        const res = await fetch('/api/dashboard?' + params.toString());
        const body = await res.json();
        if (!res.ok) {
          throw new Error(body.error ? body.error.code + ': ' + body.error.message : res.statusText);
        }
        render(body);
        errorBox.style.display = 'none';
      } catch (err) {
        errorBox.textContent = 'Update failed (' + trigger + '): ' + err.message;
        errorBox.style.display = 'block';
      }
    }

    function render(out) {
      const current = document.getElementById('current-weather');
      current.replaceChildren(...out.current_weather.map(text => {
        const div = document.createElement('div');
        div.textContent = text;
        return div;
      }));
      document.getElementById('weather-summary').textContent = out.summary;

      Plotly.react('weather-bar-chart', out.bar.data, out.bar.layout);
      Plotly.react('weather-line-chart', out.line.data, out.line.layout);
      Plotly.react('weather-pie-chart', out.pie.data, out.pie.layout);
      Plotly.react('correlation-matrix', out.heatmap.data, out.heatmap.layout);
    }

    dropdown.addEventListener('change', () => update('metric'));

    slider.addEventListener('input', () => {
      hourValue.textContent = slider.value + 'h';
      clearTimeout(pending);
      pending = setTimeout(() => update('hours'), 150);
    });

    setInterval(() => { ticks += 1; update('tick'); }, REFRESH_MS);
    update('tick');
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_all_filled() {
        let html = render(60_000);

        assert!(!html.contains("{{"));
        assert!(html.contains("const REFRESH_MS = 60000;"));
        assert!(html.contains(r#"max="168""#));
        assert!(html.contains(r#"value="12""#));
    }

    #[test]
    fn dropdown_lists_every_metric_with_temperature_selected() {
        let options = metric_options();

        assert_eq!(options.matches("<option").count(), 3);
        assert!(options.contains(r#"<option value="temperature" selected>Temperature (°C)</option>"#));
        assert!(options.contains("Wind Speed (m/s)"));
    }

    #[test]
    fn slider_marks_every_twelve_hours() {
        let marks = slider_marks();

        assert_eq!(marks.matches("<option").count(), 14);
        assert!(marks.contains(r#"label="1h""#));
        assert!(marks.contains(r#"label="157h""#));
        assert!(!marks.contains(r#"label="168h""#));
    }
}
