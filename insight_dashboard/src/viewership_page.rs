// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Twitch viewership: peak viewers, engagement and growth of the top games.

use std::sync::Arc;

use insight_charts::{
    Bubble, BubbleChart, CategoryColors, ChartRenderer, DivergingBarChart, RenderError,
    StackedAreaChart, format_grouped,
};
use insight_transforms::{
    Bucket, OTHERS, Pivot, Reducer, fold_others, group_reduce, mean_yoy_growth, pivot, top_n,
};
use log::debug;

use crate::filter::TopNControl;
use crate::page::{ChartSettings, ChartSnapshot};
use crate::records::ViewershipRow;

/// Everything the viewership charts draw, derived in one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewershipView {
    /// Games with the largest summed peak viewers, largest first.
    ///
    /// Every chart of the page reads this one selection.
    pub top_games: Arc<[String]>,
    /// Peak viewers per year: `Others` first when present, then the top games.
    pub peak_viewers: Pivot<i32, String>,
    /// Mean hours streamed, hours watched and viewers per top game.
    pub engagement: Vec<Bubble>,
    /// Mean year-over-year peak viewer growth per top game, in percent.
    pub growth: Vec<(String, f64)>,
}

impl ViewershipView {
    /// Derives the view for the `n` top games of `rows`.
    pub fn derive(rows: &[ViewershipRow], n: usize) -> Self {
        let top_games: Arc<[String]> =
            top_n(rows, |r| r.game.clone(), |r| r.peak_viewers, n).into();
        let is_top = |r: &ViewershipRow| top_games.contains(&r.game);

        let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        let mut totals: Vec<(i32, Bucket<String>, f64)> = Vec::new();
        for year in years {
            let in_year: Vec<&ViewershipRow> = rows.iter().filter(|r| r.year == year).collect();
            let folded = fold_others(
                &in_year,
                |r| r.game.clone(),
                |r| r.peak_viewers,
                &top_games[..],
            );
            totals.extend(folded.into_iter().map(|(bucket, v)| (year, bucket, v)));
        }
        let peak = pivot(&totals, |t| t.0, |t| t.1.label().to_owned(), |t| t.2);
        let has_others = totals.iter().any(|t| t.1 == Bucket::Others);
        let order: Vec<String> = has_others
            .then(|| OTHERS.to_owned())
            .into_iter()
            .chain(top_games.iter().cloned())
            .collect();
        let peak_viewers = peak.with_series_order(&order);

        let top_rows: Vec<ViewershipRow> = rows.iter().filter(|r| is_top(*r)).cloned().collect();
        let means = group_reduce(
            &top_rows,
            |r| r.game.clone(),
            &[
                Reducer::Mean(&|r: &ViewershipRow| r.hours_streamed),
                Reducer::Mean(&|r: &ViewershipRow| r.hours_watched),
                Reducer::Mean(&|r: &ViewershipRow| r.avg_viewers),
            ],
        );
        let engagement = top_games
            .iter()
            .filter_map(|game| means.iter().find(|row| &row.key == game))
            .map(|row| {
                let (streamed, watched, viewers) = (row.value(0), row.value(1), row.value(2));
                Bubble {
                    key: row.key.clone(),
                    x: streamed,
                    y: watched,
                    size: viewers,
                    details: vec![
                        format!("Avg. viewers: {}", format_grouped(viewers)),
                        format!("Avg. hours streamed: {}", format_grouped(streamed)),
                        format!("Avg. hours watched: {}", format_grouped(watched)),
                    ],
                }
            })
            .collect();

        let growth = mean_yoy_growth(&top_rows, |r| r.game.clone(), |r| r.year, |r| r.peak_viewers);

        Self {
            top_games,
            peak_viewers,
            engagement,
            growth,
        }
    }
}

/// The viewership page: one game control feeding three charts.
#[derive(Debug)]
pub struct ViewershipPage {
    games: TopNControl,
    rows: Arc<[ViewershipRow]>,
    view: Arc<ViewershipView>,
    peak_viewers: ChartRenderer<StackedAreaChart>,
    engagement: ChartRenderer<BubbleChart>,
    growth: ChartRenderer<DivergingBarChart>,
}

impl ViewershipPage {
    /// Creates an empty page.
    pub fn new(games: TopNControl, settings: ChartSettings) -> Self {
        Self {
            games,
            rows: Arc::from([]),
            view: Arc::new(ViewershipView::default()),
            peak_viewers: settings.renderer(StackedAreaChart::new(CategoryColors::games())),
            engagement: settings.renderer(BubbleChart::engagement(CategoryColors::games())),
            growth: settings.renderer(DivergingBarChart::new()),
        }
    }

    /// The game control.
    pub fn games(&self) -> TopNControl {
        self.games
    }

    /// Current derived view.
    pub fn view(&self) -> &Arc<ViewershipView> {
        &self.view
    }

    /// Replaces the rows and recomputes the view.
    pub fn set_data(&mut self, rows: Arc<[ViewershipRow]>) {
        self.rows = rows;
        self.recompute();
    }

    /// Sets the game count. Returns `true` if the view was recomputed.
    pub fn set_top_n(&mut self, n: usize) -> bool {
        let changed = self.games.set(n);
        if changed {
            self.recompute();
        }
        changed
    }

    /// Handles a raw selector value.
    pub fn on_top_n_change(&mut self, raw: i64) -> bool {
        let changed = self.games.on_change(raw);
        if changed {
            self.recompute();
        }
        changed
    }

    fn recompute(&mut self) {
        self.view = Arc::new(ViewershipView::derive(&self.rows, self.games.value()));
        debug!(
            "viewership view: {} rows, top {} games",
            self.rows.len(),
            self.view.top_games.len()
        );
    }

    /// Renders every chart from the current view at time `now`.
    pub fn render(&mut self, now: f64) -> Result<(), RenderError> {
        let view = Arc::clone(&self.view);
        self.peak_viewers.render(&view.peak_viewers, now)?;
        self.engagement.render(&view.engagement, now)?;
        self.growth.render(&view.growth, now)?;
        Ok(())
    }

    /// Peak viewers chart.
    pub fn peak_viewers(&self) -> &ChartRenderer<StackedAreaChart> {
        &self.peak_viewers
    }

    /// Mutable peak viewers chart, for pointer events and resizing.
    pub fn peak_viewers_mut(&mut self) -> &mut ChartRenderer<StackedAreaChart> {
        &mut self.peak_viewers
    }

    /// Engagement chart.
    pub fn engagement(&self) -> &ChartRenderer<BubbleChart> {
        &self.engagement
    }

    /// Mutable engagement chart.
    pub fn engagement_mut(&mut self) -> &mut ChartRenderer<BubbleChart> {
        &mut self.engagement
    }

    /// Growth chart.
    pub fn growth(&self) -> &ChartRenderer<DivergingBarChart> {
        &self.growth
    }

    /// Mutable growth chart.
    pub fn growth_mut(&mut self) -> &mut ChartRenderer<DivergingBarChart> {
        &mut self.growth
    }

    /// Snapshots of every chart at time `now`.
    pub fn snapshots(&self, now: f64) -> Vec<ChartSnapshot> {
        vec![
            ChartSnapshot::capture("peak_viewers", &self.peak_viewers, now),
            ChartSnapshot::capture("engagement_levels", &self.engagement, now),
            ChartSnapshot::capture("yoy_growth", &self.growth, now),
        ]
    }
}

#[cfg(test)]
mod tests {
    use insight_core::MarkPayload;

    use super::*;

    fn row(year: i32, game: &str, peak: f64) -> ViewershipRow {
        ViewershipRow {
            year,
            game: game.to_owned(),
            peak_viewers: peak,
            hours_streamed: peak / 10.0,
            hours_watched: peak * 2.0,
            avg_viewers: peak / 4.0,
        }
    }

    fn sample() -> Vec<ViewershipRow> {
        let mut rows = Vec::new();
        for (year, scale) in [(2019, 1.0), (2020, 2.0), (2021, 3.0)] {
            for (game, peak) in [
                ("A", 600.0),
                ("B", 500.0),
                ("C", 400.0),
                ("D", 300.0),
                ("E", 200.0),
                ("F", 100.0),
            ] {
                rows.push(row(year, game, peak * scale));
            }
        }
        rows
    }

    #[test]
    fn top_three_plus_others_preserve_yearly_totals() {
        let rows = sample();
        let view = ViewershipView::derive(&rows, 3);
        assert_eq!(&*view.top_games, ["A", "B", "C"]);
        assert_eq!(view.peak_viewers.series, [OTHERS, "A", "B", "C"]);
        assert_eq!(view.peak_viewers.xs, [2019, 2020, 2021]);
        for (x, year) in view.peak_viewers.xs.iter().enumerate() {
            let expected: f64 = rows.iter().filter(|r| r.year == *year).map(|r| r.peak_viewers).sum();
            assert_eq!(view.peak_viewers.total_at(x), expected, "total for {year}");
        }
        assert_eq!(view.peak_viewers.value(0, 0), 600.0, "Others in 2019 is D + E + F");
    }

    #[test]
    fn others_series_matches_the_folded_yearly_totals() {
        let mut rows = sample();
        rows.push(row(2022, "A", 50.0));
        let view = ViewershipView::derive(&rows, 3);
        assert_eq!(view.peak_viewers.xs, [2019, 2020, 2021, 2022]);
        for (x, year) in view.peak_viewers.xs.iter().enumerate() {
            let in_year: Vec<&ViewershipRow> = rows.iter().filter(|r| r.year == *year).collect();
            let folded = fold_others(
                &in_year,
                |r| r.game.clone(),
                |r| r.peak_viewers,
                &view.top_games[..],
            );
            let others = folded
                .iter()
                .find(|(bucket, _)| *bucket == Bucket::Others)
                .map_or(0.0, |(_, v)| *v);
            assert_eq!(view.peak_viewers.value(0, x), others, "Others in {year}");
        }
        assert_eq!(view.peak_viewers.value(0, 3), 0.0, "only A streamed in 2022");
        assert_eq!(view.peak_viewers.value(1, 3), 50.0);
    }

    #[test]
    fn sibling_charts_use_the_same_games() {
        let view = ViewershipView::derive(&sample(), 3);
        let bubbles: Vec<&str> = view.engagement.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(bubbles, ["A", "B", "C"]);
        let mut grown: Vec<&str> = view.growth.iter().map(|(g, _)| g.as_str()).collect();
        grown.sort_unstable();
        assert_eq!(grown, ["A", "B", "C"]);
        assert_eq!(view.engagement[0].size, 300.0, "mean of 150, 300 and 450");
        assert_eq!(view.engagement[0].details[0], "Avg. viewers: 300");
    }

    #[test]
    fn growth_is_the_mean_of_consecutive_years() {
        let view = ViewershipView::derive(&sample(), 3);
        let (_, a) = &view.growth[0];
        // 100% then 50%
        assert!((a - 75.0).abs() < 1e-9, "got {a}");
    }

    #[test]
    fn no_others_series_when_everything_is_selected() {
        let view = ViewershipView::derive(&sample(), 10);
        assert_eq!(view.top_games.len(), 6);
        assert!(!view.peak_viewers.series.iter().any(|s| s == OTHERS));
    }

    #[test]
    fn empty_rows_give_an_empty_view() {
        let view = ViewershipView::derive(&[], 5);
        assert_eq!(view, ViewershipView::default());
    }

    #[test]
    fn derivation_is_idempotent() {
        let rows = sample();
        assert_eq!(ViewershipView::derive(&rows, 4), ViewershipView::derive(&rows, 4));
    }

    #[test]
    fn changing_the_control_recomputes_and_re_renders() {
        let mut page = ViewershipPage::new(TopNControl::games(), ChartSettings::default());
        page.set_data(sample().into());
        assert_eq!(page.view().top_games.len(), 5);
        page.render(0.0).expect("render");

        let before = Arc::clone(&page.view().top_games);
        assert!(page.on_top_n_change(3));
        assert!(!page.on_top_n_change(3), "unchanged value");
        assert_eq!(&*page.view().top_games, &before[..3], "prefix of the larger selection");

        page.render(1_000.0).expect("render");
        assert!(page.growth().is_animating(1_100.0), "bars D and E exit");
        page.growth_mut().settle(2_000.0);
        let settled = page.growth().frame(2_000.0);
        let bars = settled
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Rect { .. }))
            .count();
        assert_eq!(bars, 3);
    }

    #[test]
    fn selector_values_are_clamped() {
        let mut page = ViewershipPage::new(TopNControl::games(), ChartSettings::default());
        page.set_data(sample().into());
        page.set_top_n(1);
        assert_eq!(page.games().value(), 3);
        assert_eq!(page.view().top_games.len(), 3);
    }

    #[test]
    fn snapshots_cover_every_chart() {
        let mut page = ViewershipPage::new(TopNControl::games(), ChartSettings::default());
        page.set_data(sample().into());
        page.render(0.0).expect("render");
        let names: Vec<&str> = page.snapshots(1_000.0).iter().map(|s| s.name).collect();
        assert_eq!(names, ["peak_viewers", "engagement_levels", "yoy_growth"]);
    }
}
