//! Interactive console menu.
//!
//! An explicit state machine: `Menu` dispatches to `CountryLoop` (one
//! threshold/type prompt and one country run per step), `Info` or `Exit`.
//! Console I/O goes through the `Console` trait.

use crate::error::{Result, ScoutError};
use crate::locations::LocationLister;
use crate::processor::CountryOrchestrator;
use async_trait::async_trait;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use shared::{ClubType, Criteria};
use std::io::{self, BufRead, BufReader, Read, Write};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// One answer read from the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C while waiting
    Interrupted,
    /// Stdin closed
    Closed,
}

#[async_trait]
pub trait Console: Send {
    /// Show `prompt` and wait for one line
    async fn read_line(&mut self, prompt: &str) -> io::Result<Input>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;

    /// Resolves on the next Ctrl-C
    async fn interrupted(&mut self);
}

/// Stdin/stdout console with Ctrl-C handling.
///
/// Lines are read on a plain OS thread and handed over a channel. A read
/// left pending when the menu exits never holds up runtime shutdown.
pub struct TerminalConsole {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::from_reader(io::stdin())
    }

    /// Console reading its lines from `reader` instead of stdin
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel(1);

        std::thread::spawn(move || {
            for line in BufReader::new(reader).lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
            debug!("Input reader finished");
        });

        Self { lines: rx }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        tokio::select! {
            line = self.lines.recv() => Ok(match line.transpose()? {
                Some(line) => Input::Line(line),
                None => Input::Closed,
            }),
            _ = tokio::signal::ctrl_c() => {
                writeln!(stdout)?;
                Ok(Input::Interrupted)
            }
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout(), "{}", line)
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
    }

    async fn interrupted(&mut self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

/// Everything the menu drives
pub struct MenuContext {
    pub lister: LocationLister,
    pub orchestrator: CountryOrchestrator,
    pub info_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuState {
    Menu,
    CountryLoop { countries: Vec<String>, next: usize },
    Info,
    Exit,
}

pub struct Menu<C: Console> {
    console: C,
    context: MenuContext,
}

impl<C: Console> Menu<C> {
    pub fn new(console: C, context: MenuContext) -> Self {
        Self { console, context }
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Run until the user exits.
    ///
    /// Only a country list page without its container is fatal.
    pub async fn run(&mut self) -> Result<()> {
        let mut state = MenuState::Menu;

        loop {
            state = match state {
                MenuState::Menu => self.main_menu().await?,
                MenuState::CountryLoop { countries, next } => self.country_step(countries, next).await?,
                MenuState::Info => self.info().await?,
                MenuState::Exit => return Ok(()),
            };
        }
    }

    async fn main_menu(&mut self) -> Result<MenuState> {
        self.console.clear()?;
        self.say("Main Menu:")?;
        self.say(&format!("[{}] Search for eligible clubs", "1".blue()))?;
        self.say(&format!("[{}] GitHub", "2".blue()))?;
        self.say(&format!("[{}] Exit", "3".red()))?;

        let choice = match self.console.read_line("Enter your choice: ").await? {
            Input::Line(line) => line,
            Input::Interrupted | Input::Closed => return self.exit(),
        };

        match choice.trim() {
            "1" => self.load_countries().await,
            "2" => Ok(MenuState::Info),
            "3" => self.exit(),
            _ => {
                self.say("Invalid choice. Please enter a valid number.")?;
                Ok(MenuState::Menu)
            }
        }
    }

    async fn load_countries(&mut self) -> Result<MenuState> {
        match self.context.lister.get_locations().await {
            Ok(countries) if countries.is_empty() => {
                self.say("No countries found.")?;
                self.pause().await
            }
            Ok(countries) => Ok(MenuState::CountryLoop { countries, next: 0 }),
            Err(e @ ScoutError::Structure(_)) => {
                error!(error = %e, "Country list page changed");
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load country list");
                self.say(&e.to_string())?;
                self.pause().await
            }
        }
    }

    async fn country_step(&mut self, countries: Vec<String>, next: usize) -> Result<MenuState> {
        let Some(country) = countries.get(next).cloned() else {
            info!(countries = countries.len(), "Search complete");
            return self.pause().await;
        };
        let skip = MenuState::CountryLoop {
            countries,
            next: next + 1,
        };

        self.say(&format!("Country: {}", country))?;

        let limit = match self.console.read_line("Enter your trophies: ").await? {
            Input::Line(line) => line,
            Input::Interrupted => return self.interrupted(),
            Input::Closed => return Ok(MenuState::Exit),
        };
        let Ok(limit) = limit.trim().parse::<i64>() else {
            self.say("Invalid input. Please enter a valid number.")?;
            return Ok(skip);
        };

        self.say("Choose the eligible club type:")?;
        self.say("[1] Open")?;
        self.say("[2] Invite Only")?;
        self.say("[3] Closed")?;
        let choice = match self.console.read_line("Enter your choice (1, 2, or 3): ").await? {
            Input::Line(line) => line,
            Input::Interrupted => return self.interrupted(),
            Input::Closed => return Ok(MenuState::Exit),
        };
        let Some(club_type) = ClubType::from_choice(&choice) else {
            self.say("Invalid choice. Skipping country.")?;
            return Ok(skip);
        };

        let criteria = Criteria::new(limit, club_type);
        info!(
            country = %country,
            limit = limit,
            club_type = %club_type,
            "Searching country"
        );

        let (result, interrupted) = {
            let dispatch = self.context.orchestrator.process_country(&country, criteria);
            tokio::pin!(dispatch);

            tokio::select! {
                result = &mut dispatch => (result, false),
                _ = self.console.interrupted() => {
                    // In-flight checks finish; no further country is started
                    self.console.write_line("Process interrupted. Exiting...")?;
                    (dispatch.await, true)
                }
            }
        };

        if let Err(e) = result {
            warn!(country = %country, error = %e, "Country search failed");
            self.say(&e.to_string())?;
        }

        if interrupted {
            return Ok(MenuState::Menu);
        }
        Ok(skip)
    }

    async fn info(&mut self) -> Result<MenuState> {
        let line = format!("GitHub repository: {}", self.context.info_url);
        self.say(&line)?;
        self.pause().await
    }

    fn interrupted(&mut self) -> Result<MenuState> {
        self.say("Process interrupted. Exiting...")?;
        Ok(MenuState::Menu)
    }

    fn exit(&mut self) -> Result<MenuState> {
        self.say("Exiting...")?;
        Ok(MenuState::Exit)
    }

    /// Hold the screen until enter is pressed
    async fn pause(&mut self) -> Result<MenuState> {
        match self.console.read_line("Press enter to continue...").await? {
            Input::Closed => Ok(MenuState::Exit),
            Input::Line(_) | Input::Interrupted => Ok(MenuState::Menu),
        }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        self.console.write_line(line)?;
        Ok(())
    }
}
