//! Terminal front end for a practice session.
//!
//! Commands are read line by line from stdin while a one-second ticker drives
//! the countdown on the same task.

use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};

use services::practice::{MatchingGroupStep, MultipleChoiceStep, PracticeSummary};
use services::{
    Column, PracticeError, PracticeObserver, PracticeSession, SecondTicker, Step, StepKey,
    StepResult, TickOutcome, UserAnswer,
};

//
// ─── INPUT ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// 1-based option number on a multiple-choice step.
    Choose(usize),
    /// 1-based item number in a matching column.
    Toggle(Column, usize),
    Submit,
    Next,
    Back,
    Finish,
    Help,
}

fn positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

#[must_use]
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "s" | "submit" => Some(Input::Submit),
        "n" | "next" => Some(Input::Next),
        "b" | "back" => Some(Input::Back),
        "f" | "finish" | "q" | "quit" => Some(Input::Finish),
        "h" | "help" | "?" => Some(Input::Help),
        other => {
            if let Some(rest) = other.strip_prefix('l') {
                positive(rest).map(|n| Input::Toggle(Column::Left, n))
            } else if let Some(rest) = other.strip_prefix('r') {
                positive(rest).map(|n| Input::Toggle(Column::Right, n))
            } else {
                positive(other).map(Input::Choose)
            }
        }
    }
}

pub fn print_help() {
    println!("Commands:");
    println!("  <n>        pick option n (multiple choice)");
    println!("  l<n> r<n>  click item n in the left or right column (matching)");
    println!("  s          submit the current step");
    println!("  n / b      next / previous step");
    println!("  f          finish and show the summary");
    println!("  h          this help");
}

//
// ─── OBSERVER ──────────────────────────────────────────────────────────────────
//

/// Prints feedback cues as the session reports them.
#[derive(Debug, Default)]
pub struct TerminalCues;

impl PracticeObserver for TerminalCues {
    fn on_correct(&self, result: &StepResult) {
        println!("  ✓ correct! +{} points", result.points_earned);
    }

    fn on_incorrect(&self, result: &StepResult) {
        match result.pair_score() {
            Some((correct, total)) => println!("  ✗ not quite: {correct} of {total} pairs right"),
            None => println!("  ✗ not quite"),
        }
    }

    fn on_time_low(&self, _step: StepKey, remaining_secs: u32) {
        println!("  ⏳ {remaining_secs}s left");
    }

    fn on_time_expired(&self, _step: StepKey) {
        println!("  ⌛ time's up");
    }
}

//
// ─── LOOP ──────────────────────────────────────────────────────────────────────
//

/// Run the interactive loop until the player finishes or stdin closes.
///
/// # Errors
///
/// Returns an error when reading stdin fails.
pub async fn play(session: &mut PracticeSession) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = SecondTicker::new();

    print_help();
    render(session);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Finish) => break,
                    Some(Input::Help) => print_help(),
                    Some(input) => {
                        let before = session.current_index();
                        match apply(session, input) {
                            Ok(()) => {
                                if session.current_index() != before {
                                    ticker.reset();
                                }
                                render(session);
                            }
                            Err(err) => println!("  {err}"),
                        }
                    }
                    None => println!("  unrecognised input, h for help"),
                }
            }
            () = ticker.tick(), if session.timer_running() => {
                if let TickOutcome::Expired(_) = session.tick() {
                    render(session);
                }
            }
        }
    }
    Ok(())
}

fn apply(session: &mut PracticeSession, input: Input) -> Result<(), PracticeError> {
    match input {
        Input::Choose(n) => {
            let option = match session.current_step() {
                Some(Step::MultipleChoice(step)) => step.question.options.get(n - 1).map(|o| o.id),
                _ => {
                    println!("  options can only be picked on a multiple-choice step");
                    return Ok(());
                }
            };
            match option {
                Some(option) => session.select_option(option).map(|_| ()),
                None => {
                    println!("  there is no option {n}");
                    Ok(())
                }
            }
        }
        Input::Toggle(column, n) => {
            let item = match session.current_step() {
                Some(Step::MatchingGroup(group)) => {
                    group.columns.column(column).get(n - 1).map(|e| e.key)
                }
                _ => {
                    println!("  items can only be clicked on a matching step");
                    return Ok(());
                }
            };
            match item {
                Some(item) => session.toggle_matching_item(column, item).map(|_| ()),
                None => {
                    println!("  there is no {column} item {n}");
                    Ok(())
                }
            }
        }
        Input::Submit => session.submit_current().map(|_| ()),
        Input::Next => session.advance().map(|_| ()),
        Input::Back => session.go_back().map(|_| ()),
        Input::Finish | Input::Help => Ok(()),
    }
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn render(session: &PracticeSession) {
    let progress = session.progress();
    let Some(step) = session.current_step() else {
        return;
    };
    println!();
    print!("[{}/{}] ", progress.position, progress.total_steps);
    match step {
        Step::Intro => {
            println!("Matching round");
            println!("  Pair each item on the left with its partner on the right.");
            println!("  Type s to begin.");
        }
        Step::MultipleChoice(step) => render_choice(session, step),
        Step::MatchingGroup(group) => render_matching(session, group),
    }
}

fn timer_label(session: &PracticeSession) -> String {
    if session.is_current_graded() {
        "graded".into()
    } else {
        format!("{}s left", session.remaining_secs())
    }
}

fn render_choice(session: &PracticeSession, step: &MultipleChoiceStep) {
    let question = &step.question;
    let kind = if question.allow_multiple {
        "pick all that apply"
    } else {
        "pick one"
    };
    println!(
        "{} ({kind}, {} pts, {})",
        question.text,
        question.points,
        timer_label(session)
    );
    if let Some(hint) = &question.hint {
        println!("  hint: {hint}");
    }

    let selected = session
        .current_answer()
        .and_then(UserAnswer::selected_options);
    let graded = session.is_current_graded();
    for (index, option) in question.options.iter().enumerate() {
        let mark = if selected.is_some_and(|s| s.contains(&option.id)) {
            "x"
        } else {
            " "
        };
        let verdict = if graded && option.is_correct { "  ✓" } else { "" };
        println!("  {}. [{mark}] {}{verdict}", index + 1, option.text);
    }
}

fn render_matching(session: &PracticeSession, group: &MatchingGroupStep) {
    println!(
        "Match {} ({} pts, {})",
        group.type_pair,
        group.points(),
        timer_label(session)
    );
    let board = session.current_answer().and_then(UserAnswer::board);

    for column in [Column::Left, Column::Right] {
        println!("  {column}:");
        let prefix = column_prefix(column);
        let partners = group.columns.column(column.other());
        for (index, entry) in group.columns.column(column).iter().enumerate() {
            let pending = board.and_then(|b| b.pending(column)) == Some(entry.key);
            let partner = board
                .and_then(|b| b.pair_for(column, entry.key))
                .and_then(|pair| {
                    let other = pair.key_in(column.other());
                    partners.iter().position(|e| e.key == other)
                })
                .map(|i| format!("  ↔ {}{}", column_prefix(column.other()), i + 1))
                .unwrap_or_default();
            let pending = if pending { " *" } else { "" };
            println!(
                "    {prefix}{}. {}{pending}{partner}",
                index + 1,
                entry.content.display_label()
            );
        }
    }
}

fn column_prefix(column: Column) -> char {
    match column {
        Column::Left => 'l',
        Column::Right => 'r',
    }
}

pub fn print_summary(summary: &PracticeSummary) {
    println!();
    println!(
        "Finished in {}s: {}/{} points, {} of {} steps correct ({}%, {})",
        summary.duration_secs(),
        summary.earned_points,
        summary.total_points,
        summary.correct_steps,
        summary.scoreable_steps,
        summary.percentage,
        summary.tier
    );
    for review in &summary.steps {
        let verdict = if review.is_correct { "✓" } else { "✗" };
        let pairs = review
            .pair_score
            .map(|(correct, total)| format!(" ({correct}/{total} pairs)"))
            .unwrap_or_default();
        println!(
            "  {verdict} {:?}: {}/{} pts{pairs}",
            review.step, review.points_earned, review.points_possible
        );
    }
}
