// Interactive navigation shell — login, welcome, home, sanctuary, reflections

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    cursor,
    style::Stylize,
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crate::analysis::{EmotionClassifier, InsightGenerator};
use crate::cli::input::{parse_emotion_choice, parse_warmth_choice, HomeAction};
use crate::cli::render::{age_label, content_preview, count_noun, emotion_bar, warmth_bar};
use crate::emotion::Emotion;
use crate::flow::{EntryFlow, ReflectionFlow, SelfReport, FADEOUT_DWELL};
use crate::journal::{Entry, JournalStore, Reflection, User};
use crate::stats::JournalStats;

/// How much of a message the listings show.
const PREVIEW_CHARS: usize = 56;

/// Width of the emotion journey bars.
const JOURNEY_BAR_WIDTH: usize = 24;

/// Get current terminal width, or default to 80 if not a TTY
fn terminal_width() -> usize {
    terminal::size().map(|(w, _)| w as usize).unwrap_or(80)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Welcome,
    Home,
    Sanctuary,
    Reflections,
    Exit,
}

pub struct Shell {
    store: JournalStore,
    classifier: EmotionClassifier,
    insight: InsightGenerator,
    delay_minutes: i64,
    call_timeout: Duration,
    is_interactive: bool,
}

impl Shell {
    pub fn new(
        store: JournalStore,
        classifier: EmotionClassifier,
        insight: InsightGenerator,
        delay_minutes: i64,
        call_timeout: Duration,
    ) -> Self {
        // Detect if we're in interactive mode (stdout is a TTY)
        let is_interactive = io::stdout().is_terminal();

        Self {
            store,
            classifier,
            insight,
            delay_minutes,
            call_timeout,
            is_interactive,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.is_interactive {
            println!("Unsent v0.1.0");
            println!(
                "{}",
                "A sanctuary for your unspoken feelings".dark_grey()
            );
        } else {
            eprintln!("# Unsent v0.1.0 - Non-interactive mode");
        }

        // A saved profile skips straight to home
        let mut screen = if self.store.read_user()?.is_some() {
            Screen::Home
        } else {
            Screen::Login
        };

        while screen != Screen::Exit {
            let current = screen;
            screen = match self.step(current).await {
                Ok(next) => next,
                // Anything that breaks away from home can recover there;
                // a broken home screen has nowhere left to land.
                Err(e) if current != Screen::Home => {
                    eprintln!("Error: {:#}", e);
                    Screen::Home
                }
                Err(e) => return Err(e),
            };
        }

        if self.is_interactive {
            println!();
            println!("{}", "Your words are kept. Goodbye.".dark_grey());
        }
        Ok(())
    }

    async fn step(&self, screen: Screen) -> Result<Screen> {
        match screen {
            Screen::Login => self.login_screen(),
            Screen::Welcome => self.welcome_screen(),
            Screen::Home => self.home_screen(),
            Screen::Sanctuary => self.sanctuary_screen().await,
            Screen::Reflections => self.reflections_screen().await,
            Screen::Exit => Ok(Screen::Exit),
        }
    }

    // ── login and welcome ─────────────────────────────────────────────────────

    /// Demo-mode sign-in. No credentials; the gesture is the point.
    fn login_screen(&self) -> Result<Screen> {
        println!();
        self.print_separator();
        println!("{}", "Unsent".bold());
        println!("{}", "A sanctuary for your unspoken feelings".dark_grey());
        println!();
        println!(
            "{}",
            "Welcome back. Your feelings are safe here.".dark_grey()
        );

        if self
            .prompt_line("Demo mode: press Enter to sign in... ")?
            .is_none()
        {
            return Ok(Screen::Exit);
        }
        Ok(Screen::Welcome)
    }

    fn welcome_screen(&self) -> Result<Screen> {
        // A profile saved earlier skips the naming step
        if self.store.read_user()?.is_some() {
            return Ok(Screen::Home);
        }

        println!();
        println!("{}", "A sanctuary for your shadow thoughts".dark_grey());
        println!(
            "{}",
            "Write the words you cannot say. Let them rest. Watch yourself heal.".dark_grey()
        );
        println!();

        loop {
            let Some(name) = self.prompt_line("What should we call you? ")? else {
                return Ok(Screen::Exit);
            };
            if name.is_empty() {
                println!("{}", "A name, a nickname, anything at all.".dark_grey());
                continue;
            }
            self.store.write_user(&User::new(name))?;
            return Ok(Screen::Home);
        }
    }

    // ── home ──────────────────────────────────────────────────────────────────

    fn home_screen(&self) -> Result<Screen> {
        let Some(user) = self.store.read_user()? else {
            return Ok(Screen::Login);
        };
        let entries = self.store.list_entries()?;
        let reflections = self.store.list_reflections()?;
        let stats = JournalStats::compute(&entries, &reflections, self.delay_minutes, Utc::now());

        println!();
        self.print_separator();
        println!("{}", format!("Welcome back, {}", user.name).bold());
        println!("{}", "Your sanctuary awaits".dark_grey());
        println!();

        self.print_journey(&stats);

        println!();
        let reflect_label = if stats.ready_to_revisit > 0 {
            format!("[r] reflections ({} ready)", stats.ready_to_revisit)
        } else {
            "[r] reflections".to_string()
        };
        println!(
            "{}",
            format!("[w] write   {}   [s] sign out   [q] quit", reflect_label).dark_grey()
        );

        loop {
            let Some(input) = self.prompt_line("> ")? else {
                return Ok(Screen::Exit);
            };
            if input.is_empty() {
                continue;
            }
            match HomeAction::parse(&input) {
                Some(HomeAction::Write) => return Ok(Screen::Sanctuary),
                Some(HomeAction::Reflections) => return Ok(Screen::Reflections),
                Some(HomeAction::SignOut) => {
                    self.store.clear_user()?;
                    println!("Signed out. The journal itself stays.");
                    return Ok(Screen::Login);
                }
                Some(HomeAction::Quit) => return Ok(Screen::Exit),
                None => println!("{}", "w, r, s, or q.".dark_grey()),
            }
        }
    }

    fn print_journey(&self, stats: &JournalStats) {
        if stats.total_entries == 0 {
            println!(
                "{}",
                "No unsent words yet. Write the first ones.".dark_grey()
            );
            return;
        }

        println!(
            "  Your journey: {} · {} · {} ready to revisit",
            count_noun(stats.total_entries, "entry", "entries"),
            count_noun(stats.total_reflections, "reflection", "reflections"),
            stats.ready_to_revisit
        );
        println!();

        println!("  {}", "Emotion journey".bold());
        let max = stats.max_count();
        for stat in &stats.feelings {
            let feeling = stat.emotion;
            // Pad before styling: escape codes would throw the columns off
            println!(
                "  {} {} {}  {}",
                feeling.glyph(),
                format!("{:<9}", feeling.as_str()).with(feeling.color()),
                format!(
                    "{:<width$}",
                    emotion_bar(stat.count, max, JOURNEY_BAR_WIDTH),
                    width = JOURNEY_BAR_WIDTH
                )
                .with(feeling.color()),
                format!(
                    "{:<10}  avg: {:.1}/10",
                    count_noun(stat.count, "entry", "entries"),
                    stat.mean_warmth
                )
                .dark_grey()
            );
        }

        if let Some(top) = stats.most_frequent() {
            println!();
            println!(
                "  {}",
                format!(
                    "✦ Most frequent: {} ({})",
                    top.emotion.as_str(),
                    count_noun(top.count, "time", "times")
                )
                .dark_grey()
            );
        }
    }

    // ── sanctuary ─────────────────────────────────────────────────────────────

    async fn sanctuary_screen(&self) -> Result<Screen> {
        let mut flow = EntryFlow::new(&self.store, &self.classifier, self.call_timeout);

        println!();
        self.print_separator();
        println!("{}", "How are you feeling?".bold());
        println!(
            "{}",
            "Share what's on your mind. It stays here, witnessed only by you.".dark_grey()
        );
        println!();

        let Some(recipient) = self.prompt_line("To whom? (Enter for yourself): ")? else {
            return Ok(Screen::Exit);
        };

        println!("Write your message. Finish with a single '.' on its own line.");
        println!("{}", "(type 'home' on the first line to go back)".dark_grey());

        let content = loop {
            match self.read_message()? {
                MessageInput::Written(content) => break content,
                MessageInput::Empty => {
                    println!(
                        "{}",
                        "The page is still blank. Write a little, or type 'home'.".dark_grey()
                    );
                }
                MessageInput::Back => {
                    flow.cancel()?;
                    return Ok(Screen::Home);
                }
                MessageInput::Eof => {
                    flow.cancel()?;
                    return Ok(Screen::Exit);
                }
            }
        };

        self.show_processing("Understanding your feelings...")?;
        let classification = flow.submit(&recipient, &content).await?;
        self.clear_processing()?;

        // Comfort: what was heard, and the line written back
        let feeling = classification.emotion;
        println!();
        println!(
            "  {} {}",
            feeling.glyph(),
            feeling.as_str().with(feeling.color()).bold()
        );
        println!();
        println!("  {}", format!("\"{}\"", classification.comfort).italic());
        println!();
        println!("Would you like to keep this thought or release it?");

        loop {
            let Some(input) = self.prompt_line("[k] keep it safe   [r] release it: ")? else {
                return Ok(Screen::Exit);
            };
            match input.to_lowercase().as_str() {
                "k" | "keep" => {
                    flow.keep()?;
                    break;
                }
                "r" | "release" => {
                    flow.release()?;
                    break;
                }
                _ => println!("{}", "k to keep, r to release.".dark_grey()),
            }
        }

        println!();
        println!("{}", "Your words rest here now...".dark_grey());
        if self.is_interactive {
            tokio::time::sleep(FADEOUT_DWELL).await;
        }
        Ok(Screen::Home)
    }

    /// Collect message lines until a lone `.`; `home` on the first line backs out.
    fn read_message(&self) -> Result<MessageInput> {
        let mut lines: Vec<String> = Vec::new();
        loop {
            let Some(line) = self.read_line_raw()? else {
                return Ok(MessageInput::Eof);
            };
            let trimmed = line.trim();
            if lines.is_empty() && trimmed.eq_ignore_ascii_case("home") {
                return Ok(MessageInput::Back);
            }
            if trimmed == "." {
                let content = lines.join("\n").trim().to_string();
                if content.is_empty() {
                    return Ok(MessageInput::Empty);
                }
                return Ok(MessageInput::Written(content));
            }
            lines.push(line);
        }
    }

    // ── reflections ───────────────────────────────────────────────────────────

    async fn reflections_screen(&self) -> Result<Screen> {
        let flow = ReflectionFlow::new(
            &self.store,
            &self.insight,
            self.delay_minutes,
            self.call_timeout,
        );
        let now = Utc::now();
        let eligible = flow.eligible_entries(now)?;

        println!();
        self.print_separator();
        println!("{}", "Remember when...".bold());
        println!("{}", "See how you've grown".dark_grey());
        println!();

        if eligible.is_empty() {
            println!("{}", "No reflections ready yet.".dark_grey());
            println!(
                "{}",
                format!(
                    "Entries become ready after {} minute{}.",
                    self.delay_minutes,
                    if self.delay_minutes == 1 { "" } else { "s" }
                )
                .dark_grey()
            );
            println!();
            if self.prompt_line("Press Enter to go home... ")?.is_none() {
                return Ok(Screen::Exit);
            }
            return Ok(Screen::Home);
        }

        for (i, entry) in eligible.iter().enumerate() {
            let feeling = entry.dominant_feeling;
            let mut tail = format!(
                "to {}  ·  {}",
                entry.recipient,
                age_label(entry.minutes_since(now))
            );
            if self.store.has_reflection(&entry.id)? {
                tail.push_str("  ·  ✨ reflected");
            }
            println!(
                "  {}. {} {}  {}",
                i + 1,
                feeling.glyph(),
                feeling.as_str().with(feeling.color()),
                tail.dark_grey()
            );
            println!(
                "     {}",
                content_preview(&entry.content, PREVIEW_CHARS).dark_grey()
            );
        }
        println!();

        loop {
            let Some(input) = self.prompt_line("Number to revisit, or Enter to go home: ")? else {
                return Ok(Screen::Exit);
            };
            if input.is_empty() {
                return Ok(Screen::Home);
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=eligible.len()).contains(&n) => {
                    return match self.entry_detail(&flow, &eligible[n - 1]).await? {
                        DetailOutcome::Back => Ok(Screen::Reflections),
                        DetailOutcome::Eof => Ok(Screen::Exit),
                    };
                }
                _ => println!("{}", "Pick a number from the list, or Enter.".dark_grey()),
            }
        }
    }

    /// THEN panel, then either the stored reflection or the self-report form.
    async fn entry_detail(&self, flow: &ReflectionFlow<'_>, entry: &Entry) -> Result<DetailOutcome> {
        let feeling = entry.dominant_feeling;

        println!();
        println!("{}", "Then".bold());
        println!(
            "  {}",
            format!(
                "to {}  ·  {}",
                entry.recipient,
                age_label(entry.minutes_since(Utc::now()))
            )
            .dark_grey()
        );
        println!(
            "  {} {} {} ({}/10)",
            feeling.glyph(),
            feeling.as_str().with(feeling.color()),
            warmth_bar(entry.warmth_level).with(feeling.color()),
            entry.warmth_level
        );
        for line in entry.content.lines() {
            println!("  {}", line.italic());
        }
        println!();

        // An entry takes one reflection; afterwards its journey is read-only
        if let Some(reflection) = self.store.reflection_for(&entry.id)? {
            println!("{}", "Now".bold());
            self.print_reflection(&reflection);
            if self.prompt_line("Press Enter to go back... ")?.is_none() {
                return Ok(DetailOutcome::Eof);
            }
            return Ok(DetailOutcome::Back);
        }

        let Some(now_feeling) = self.pick_emotion()? else {
            return Ok(DetailOutcome::Eof);
        };
        let Some(now_warmth) = self.pick_warmth()? else {
            return Ok(DetailOutcome::Eof);
        };
        let Some(note) = self.prompt_line("What's changed? What have you learned? (optional): ")?
        else {
            return Ok(DetailOutcome::Eof);
        };

        let report = SelfReport {
            now_feeling,
            now_warmth,
            note,
        };
        self.show_processing("Tracing the distance between then and now...")?;
        let result = flow.reflect(&entry.id, &report, Utc::now()).await;
        self.clear_processing()?;

        match result {
            Ok(reflection) => {
                println!();
                println!("{}", "Now".bold());
                self.print_reflection(&reflection);
            }
            Err(e) => eprintln!("Could not save the reflection: {:#}", e),
        }

        if self.prompt_line("Press Enter to go back... ")?.is_none() {
            return Ok(DetailOutcome::Eof);
        }
        Ok(DetailOutcome::Back)
    }

    fn print_reflection(&self, reflection: &Reflection) {
        let now = reflection.now_feeling;
        println!(
            "  {} {} {} ({}/10)",
            now.glyph(),
            now.as_str().with(now.color()),
            warmth_bar(reflection.now_warmth).with(now.color()),
            reflection.now_warmth
        );
        if !reflection.reflection_note.is_empty() {
            println!(
                "  {}",
                format!("\"{}\"", reflection.reflection_note).italic()
            );
        }
        println!();
        println!("  {}", reflection.growth_insight.as_str().italic());
        println!();
    }

    fn pick_emotion(&self) -> Result<Option<Emotion>> {
        println!("How do you feel about this now?");
        for (i, feeling) in Emotion::ALL.iter().enumerate() {
            println!(
                "  {:>2}. {} {}",
                i + 1,
                feeling.glyph(),
                feeling.as_str().with(feeling.color())
            );
        }
        loop {
            let Some(input) = self.prompt_line("Feeling (number or name): ")? else {
                return Ok(None);
            };
            if let Some(feeling) = parse_emotion_choice(&input) {
                return Ok(Some(feeling));
            }
            println!(
                "{}",
                "Pick one of the twelve, by number or name.".dark_grey()
            );
        }
    }

    fn pick_warmth(&self) -> Result<Option<u8>> {
        loop {
            let Some(input) = self.prompt_line("How strong, 1-10 (Enter for 5): ")? else {
                return Ok(None);
            };
            match parse_warmth_choice(&input) {
                Some(warmth) => return Ok(Some(warmth)),
                None => println!("{}", "A number from 1 to 10.".dark_grey()),
            }
        }
    }

    // ── terminal plumbing ─────────────────────────────────────────────────────

    /// Print separator line that adapts to terminal width
    fn print_separator(&self) {
        let width = terminal_width();
        println!("{}", "─".repeat(width));
    }

    fn show_processing(&self, label: &str) -> Result<()> {
        if self.is_interactive {
            print!("{}", label.dark_grey());
            io::stdout().flush()?;
        }
        Ok(())
    }

    fn clear_processing(&self) -> Result<()> {
        if self.is_interactive {
            io::stdout()
                .execute(cursor::MoveToColumn(0))?
                .execute(Clear(ClearType::CurrentLine))?;
        }
        Ok(())
    }

    /// One trimmed line, or `None` when input has ended.
    fn prompt_line(&self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;
        Ok(self.read_line_raw()?.map(|line| line.trim().to_string()))
    }

    /// One line with interior whitespace preserved, or `None` at end of input.
    fn read_line_raw(&self) -> Result<Option<String>> {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        while input.ends_with('\n') || input.ends_with('\r') {
            input.pop();
        }
        Ok(Some(input))
    }
}

enum MessageInput {
    Written(String),
    Empty,
    Back,
    Eof,
}

enum DetailOutcome {
    Back,
    Eof,
}
