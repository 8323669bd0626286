// benches/scorecard.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use crease::{aggregate, data::Series, specs::scorecard};

const MATCH_URL: &str = "https://www.espncricinfo.com/series/bench-cup-2024-1/a-vs-b-1st-match-2/full-scorecard";

fn load_sample() -> String {
    // Best-effort: a saved real page if present; otherwise a synthetic two-innings card.
    std::fs::read_to_string(".ignore/page_samples/scorecard.html").unwrap_or_else(|_| synthetic())
}

fn synthetic() -> String {
    let dismissals = ["c Smith b Jones", "run out (Patel/Khan)", "st Buttler b Rashid", "lbw b Starc", "not out"];
    let mut html = String::from("<html><body>");
    for innings in 0..2 {
        html.push_str("<table><thead><tr><th>Batting</th><th>R</th><th>B</th><th>M</th></tr></thead><tbody>");
        for i in 0..11 {
            let d = dismissals[(i + innings) % dismissals.len()];
            html.push_str(&format!(
                "<tr><td><a href=\"/cricketers/player-{innings}{i}-{i}00{innings}\">Player {innings}{i}†</a></td>\
                 <td>{d}</td><td>{r}</td><td>{b}</td><td>{m}</td><td>2</td><td>1</td><td>120.00</td></tr>",
                r = i * 3,
                b = i * 2 + 1,
                m = i * 4,
            ));
        }
        html.push_str("</tbody></table>");
        html.push_str("<table><thead><tr><th>Bowling</th><th>O</th></tr></thead><tbody>");
        for i in 0..6 {
            html.push_str(&format!(
                "<tr><td><a href=\"/cricketers/bowler-{innings}{i}-{i}90{innings}\">Bowler {innings}{i}</a></td>\
                 <td>4</td><td>0</td><td>{r}</td><td>1</td><td>7.50</td><td>9</td><td>2</td><td>1</td><td>0</td><td>0</td></tr>",
                r = 20 + i,
            ));
        }
        html.push_str("</tbody></table>");
    }
    html.push_str("</body></html>");
    html
}

fn bench_scorecard(c: &mut Criterion) {
    let doc = load_sample();

    c.bench_function("scorecard_parse_doc", |b| {
        b.iter(|| {
            let record = scorecard::parse_doc(black_box(&doc), MATCH_URL);
            black_box(record.batting.len() + record.bowling.len())
        })
    });

    let record = scorecard::parse_doc(&doc, MATCH_URL);
    let series = Series {
        url: "https://www.espncricinfo.com/series/bench-cup-2024-1".to_string(),
        matches: vec![record; 60],
    };
    c.bench_function("aggregate_60_matches", |b| {
        b.iter(|| {
            let agg = aggregate::aggregate(black_box(&series));
            black_box(agg.stats.players.len())
        })
    });
}

criterion_group!(benches, bench_scorecard);
criterion_main!(benches);
