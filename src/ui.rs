use crate::models::{WeeklyStats, Workout, WorkoutFilter, WorkoutForm};
use crate::stats::{StatsRange, WeeklySummary, parse_week, week_bounds};
use crate::streak::{StreakResult, streak_emoji, streak_message};

const RANGE_OPTIONS: [(u32, &str); 3] = [(4, "Last 4 weeks"), (8, "Last 8 weeks"), (12, "Last 12 weeks")];

pub fn render_workouts(
    workouts: &[Workout],
    filter: &WorkoutFilter,
    current_week: &str,
    streak: StreakResult,
) -> String {
    let rows = if workouts.is_empty() {
        r#"<p class="empty">No workouts found. <a href="/workouts/new">Log your first one.</a></p>"#.to_string()
    } else {
        workouts.iter().map(render_workout_row).collect::<Vec<_>>().join("\n")
    };

    let body = WORKOUTS_HTML
        .replace("{{STREAK}}", &render_streak_card(streak))
        .replace("{{CURRENT_WEEK}}", &escape_html(current_week))
        .replace("{{FILTER_NOTE}}", &filter_note(filter))
        .replace("{{WEEK}}", &escape_html(filter.week.as_deref().unwrap_or("")))
        .replace("{{EXERCISE}}", &escape_html(filter.exercise.as_deref().unwrap_or("")))
        .replace("{{DAYS}}", &filter.days.map(|d| d.to_string()).unwrap_or_default())
        .replace("{{ROWS}}", &rows);
    render_page("Workouts", &body)
}

fn render_workout_row(workout: &Workout) -> String {
    format!(
        r#"<article class="row">
  <div>
    <a class="exercise" href="/workouts/{id}">{exercise}</a>
    <span class="meta">{date} · {sets} × {reps} @ {weight} kg · RPE {rpe}</span>
  </div>
  <span class="volume">{volume:.1} kg</span>
  <form method="post" action="/workouts/{id}/delete">
    <button class="btn-ghost" type="submit">Delete</button>
  </form>
</article>"#,
        id = workout.id,
        exercise = escape_html(&workout.exercise),
        date = escape_html(&workout.date),
        sets = workout.sets,
        reps = workout.reps,
        weight = workout.weight,
        rpe = workout.rpe,
        volume = workout.volume(),
    )
}

fn filter_note(filter: &WorkoutFilter) -> String {
    if filter.is_empty() {
        return "Showing all workouts.".to_string();
    }
    let mut parts = Vec::new();
    if let Some(week) = &filter.week {
        let span = parse_week(week)
            .ok()
            .and_then(|(year, number)| week_bounds(year, number))
            .map(|(start, end)| format!(" ({start} to {end})"))
            .unwrap_or_default();
        parts.push(format!("week {}{span}", escape_html(week)));
    }
    if let Some(exercise) = &filter.exercise {
        parts.push(format!("exercise matching \"{}\"", escape_html(exercise)));
    }
    if let Some(days) = filter.days {
        parts.push(format!("the last {days} days"));
    }
    format!("Filtered by {}.", parts.join(", "))
}

pub fn render_new_workout(form: &WorkoutForm, errors: &[String]) -> String {
    let body = NEW_WORKOUT_HTML.replace("{{FORM}}", &render_form("/workouts", form, errors, "Save workout"));
    render_page("Add workout", &body)
}

pub fn render_workout_detail(workout: &Workout, form: &WorkoutForm, errors: &[String]) -> String {
    let body = DETAIL_HTML
        .replace("{{ID}}", &workout.id.to_string())
        .replace("{{VOLUME}}", &format!("{:.1}", workout.volume()))
        .replace("{{SETS}}", &workout.sets.to_string())
        .replace("{{REPS}}", &workout.reps.to_string())
        .replace("{{WEIGHT}}", &workout.weight.to_string())
        .replace("{{RPE}}", &workout.rpe.to_string())
        .replace(
            "{{CREATED}}",
            &escape_html(workout.created_at.as_deref().unwrap_or("unknown")),
        )
        .replace(
            "{{FORM}}",
            &render_form(&format!("/workouts/{}", workout.id), form, errors, "Update workout"),
        )
        .replace("{{DATE}}", &escape_html(&workout.date))
        .replace("{{EXERCISE}}", &escape_html(&workout.exercise));
    render_page(&workout.exercise, &body)
}

fn render_form(action: &str, form: &WorkoutForm, errors: &[String], submit: &str) -> String {
    let errors = if errors.is_empty() {
        String::new()
    } else {
        let items: Vec<String> = errors
            .iter()
            .map(|err| format!("<li>{}</li>", escape_html(err)))
            .collect();
        format!(r#"<ul class="errors">{}</ul>"#, items.join(""))
    };

    FORM_HTML
        .replace("{{ACTION}}", action)
        .replace("{{SUBMIT}}", submit)
        .replace("{{ERRORS}}", &errors)
        .replace("{{DATE}}", &escape_html(&form.date))
        .replace("{{EXERCISE}}", &escape_html(&form.exercise))
        .replace("{{SETS}}", &escape_html(&form.sets))
        .replace("{{REPS}}", &escape_html(&form.reps))
        .replace("{{WEIGHT}}", &escape_html(&form.weight))
        .replace("{{RPE}}", &escape_html(&form.rpe))
}

pub fn render_progress(
    range: StatsRange,
    stats: &[WeeklyStats],
    summary: &WeeklySummary,
    streak: StreakResult,
) -> String {
    let options: String = RANGE_OPTIONS
        .iter()
        .map(|(weeks, label)| {
            let selected = if *weeks == range.weeks() { " selected" } else { "" };
            format!(r#"<option value="last{weeks}w"{selected}>{label}</option>"#)
        })
        .collect();

    let content = if stats.is_empty() {
        r#"<p class="empty">No workout data found for the selected period.</p>"#.to_string()
    } else {
        let cards: String = stats
            .iter()
            .map(|week| {
                format!(
                    r#"<div class="stat"><span class="label">{week}</span><span>Workouts: {workouts}</span><span>Volume: {volume:.1} kg</span></div>"#,
                    week = escape_html(&week.week),
                    workouts = week.total_workouts,
                    volume = week.volume,
                )
            })
            .collect();
        let bars: String = summary
            .bars
            .iter()
            .map(|bar| {
                format!(
                    r#"<div class="chart-bar" title="{week}"><div class="bar" style="height: {height}px"></div><span>{label}</span></div>"#,
                    week = escape_html(&bar.week),
                    height = bar.height,
                    label = escape_html(&bar.label),
                )
            })
            .collect();

        PROGRESS_STATS_HTML
            .replace("{{TOTAL_WEEKS}}", &summary.total_weeks.to_string())
            .replace("{{TOTAL_WORKOUTS}}", &summary.total_workouts.to_string())
            .replace("{{TOTAL_VOLUME}}", &format!("{:.1}", summary.total_volume))
            .replace("{{AVG_VOLUME}}", &format!("{:.1}", summary.average_volume))
            .replace("{{WEEK_CARDS}}", &cards)
            .replace("{{BARS}}", &bars)
    };

    let body = PROGRESS_HTML
        .replace("{{OPTIONS}}", &options)
        .replace("{{STREAK}}", &render_streak_card(streak))
        .replace("{{CONTENT}}", &content);
    render_page("Progress", &body)
}

pub fn render_streak_card(streak: StreakResult) -> String {
    STREAK_HTML
        .replace("{{EMOJI}}", streak_emoji(streak.current_streak))
        .replace("{{DAYS}}", &streak.current_streak.to_string())
        .replace("{{MESSAGE}}", &escape_html(&streak_message(streak.current_streak)))
        .replace("{{ACTIVE}}", &streak.total_active_days.to_string())
}

pub fn render_page(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BODY}}", body)
}

/// Escapes text for HTML bodies and attributes. Braces are escaped too so
/// user text can never be mistaken for a template placeholder.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · SyncFit</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    nav {
      width: min(920px, 100%);
      display: flex;
      gap: 18px;
      margin-bottom: 18px;
    }

    nav a {
      color: var(--accent-2);
      font-weight: 600;
      text-decoration: none;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle,
    .meta,
    .empty {
      margin: 0;
      color: #5f5c57;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat,
    .row,
    .streak {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .row {
      grid-template-columns: 1fr auto auto;
      align-items: center;
    }

    .row .exercise {
      display: block;
      font-weight: 600;
      color: var(--accent-2);
    }

    .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .value,
    .streak-number {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .volume {
      color: var(--accent);
      font-weight: 600;
    }

    form.grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
    }

    input,
    select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .btn-ghost {
      background: transparent;
      color: #c63b2b;
      padding: 8px 12px;
    }

    .errors {
      color: #c63b2b;
      margin: 0;
    }

    .chart {
      display: flex;
      align-items: flex-end;
      gap: 12px;
      height: 130px;
    }

    .chart-bar {
      display: grid;
      justify-items: center;
      gap: 6px;
      font-size: 0.8rem;
      color: #7a746d;
    }

    .chart-bar .bar {
      width: 28px;
      border-radius: 8px 8px 0 0;
      background: var(--accent);
    }
  </style>
</head>
<body>
  <nav>
    <a href="/">Workouts</a>
    <a href="/workouts/new">Add workout</a>
    <a href="/progress">Progress</a>
  </nav>
  <main class="app">
{{BODY}}
  </main>
</body>
</html>
"#;

const STREAK_HTML: &str = r#"<section class="streak">
  <span class="label">🔥 Workout Streaks</span>
  <span class="streak-number">{{EMOJI}} {{DAYS}} days</span>
  <span class="streak-message">{{MESSAGE}}</span>
  <span class="meta">Total active days: {{ACTIVE}}</span>
</section>"#;

const WORKOUTS_HTML: &str = r#"<header>
  <h1>Your Workouts</h1>
  <p class="subtitle">{{FILTER_NOTE}}</p>
</header>
{{STREAK}}
<form class="grid" method="get" action="/">
  <label>Week<input name="week" placeholder="{{CURRENT_WEEK}}" value="{{WEEK}}" /></label>
  <label>Exercise<input name="exercise" value="{{EXERCISE}}" /></label>
  <label>Last days<input name="days" type="number" min="1" value="{{DAYS}}" /></label>
  <button type="submit">Filter</button>
  <a href="/?week={{CURRENT_WEEK}}">This week</a>
  <a href="/">Clear</a>
</form>
<section class="list">
{{ROWS}}
</section>"#;

const NEW_WORKOUT_HTML: &str = r#"<header>
  <h1>Add New Workout</h1>
</header>
{{FORM}}"#;

const DETAIL_HTML: &str = r#"<header>
  <h1>{{EXERCISE}}</h1>
  <p class="subtitle">{{DATE}}</p>
</header>
<section class="panel">
  <div class="stat"><span class="label">Sets</span><span class="value">{{SETS}}</span></div>
  <div class="stat"><span class="label">Reps</span><span class="value">{{REPS}}</span></div>
  <div class="stat"><span class="label">Weight</span><span class="value">{{WEIGHT}} kg</span></div>
  <div class="stat"><span class="label">RPE</span><span class="value">{{RPE}}</span></div>
  <div class="stat"><span class="label">Volume</span><span class="value volume">{{VOLUME}} kg</span></div>
</section>
<p class="meta">Logged on {{CREATED}}</p>
<h2>Edit workout</h2>
{{FORM}}
<details>
  <summary>Delete this workout</summary>
  <form method="post" action="/workouts/{{ID}}/delete">
    <p class="meta">This cannot be undone.</p>
    <button type="submit">Yes, delete it</button>
  </form>
</details>"#;

const FORM_HTML: &str = r#"<form class="grid" method="post" action="{{ACTION}}">
  {{ERRORS}}
  <label>Date<input name="date" type="date" required value="{{DATE}}" /></label>
  <label>Exercise<input name="exercise" required minlength="2" maxlength="100" value="{{EXERCISE}}" /></label>
  <label>Sets<input name="sets" type="number" min="1" max="50" required value="{{SETS}}" /></label>
  <label>Reps<input name="reps" type="number" min="1" max="1000" required value="{{REPS}}" /></label>
  <label>Weight (kg)<input name="weight" type="number" step="0.5" min="0.5" max="1000" required value="{{WEIGHT}}" /></label>
  <label>RPE (1-10)<input name="rpe" type="number" step="0.5" min="1" max="10" required value="{{RPE}}" /></label>
  <button type="submit">{{SUBMIT}}</button>
</form>"#;

const PROGRESS_HTML: &str = r#"<header>
  <h1>Your Progress</h1>
  <form method="get" action="/progress">
    <label>Time range
      <select name="range" onchange="this.form.submit()">{{OPTIONS}}</select>
    </label>
    <noscript><button type="submit">Show</button></noscript>
  </form>
</header>
{{STREAK}}
{{CONTENT}}"#;

const PROGRESS_STATS_HTML: &str = r#"<section class="panel">
  <div class="stat"><span class="label">Total Weeks</span><span class="value">{{TOTAL_WEEKS}}</span></div>
  <div class="stat"><span class="label">Total Workouts</span><span class="value">{{TOTAL_WORKOUTS}}</span></div>
  <div class="stat"><span class="label">Total Volume</span><span class="value">{{TOTAL_VOLUME}} kg</span></div>
  <div class="stat"><span class="label">Avg Volume/Week</span><span class="value">{{AVG_VOLUME}} kg</span></div>
</section>
<h2>Weekly Breakdown</h2>
<section class="panel">{{WEEK_CARDS}}</section>
<h2>Volume Chart</h2>
<div class="chart">{{BARS}}</div>"#;
