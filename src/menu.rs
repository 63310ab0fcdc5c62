use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::batch;
use crate::date::today_gregorian;
use crate::error::Result;
use crate::quote::QuoteClient;
use crate::watchlist;

/// Interactive menu loop for the no-argument invocation. Owns nothing but
/// references; the client is constructed once in `main`.
pub struct Menu<'a> {
    client: &'a QuoteClient,
    watchlist_path: &'a str,
    delay: Duration,
}

impl<'a> Menu<'a> {
    pub fn new(client: &'a QuoteClient, watchlist_path: &'a str, delay: Duration) -> Self {
        Self {
            client,
            watchlist_path,
            delay,
        }
    }

    pub fn run(&self) -> Result<()> {
        loop {
            self.show_menu()?;
            let choice = read_line()?;

            match choice.trim() {
                "1" => self.single_query()?,
                "2" => self.batch_query()?,
                "0" => {
                    clear_screen()?;
                    println!("\nThanks for using, goodbye!\n");
                    return Ok(());
                }
                _ => {
                    clear_screen()?;
                    println!("\nInvalid choice, please try again.\n");
                    thread::sleep(Duration::from_millis(1000));
                }
            }
        }
    }

    fn show_menu(&self) -> Result<()> {
        clear_screen()?;
        println!("\n{}", "=".repeat(40));
        println!("        TWSE Stock Quote Lookup");
        println!("{}", "=".repeat(40));
        println!("1. Single stock query");
        println!("2. Watch-list batch query");
        println!("0. Exit");
        println!("{}", "=".repeat(40));
        print!("Select an option (0-2): ");
        io::stdout().flush()?;
        Ok(())
    }

    fn single_query(&self) -> Result<()> {
        clear_screen()?;
        println!("\n[Single stock query]");
        print!("Stock code (e.g. 2330): ");
        io::stdout().flush()?;
        let code = read_line()?.trim().to_string();

        let date = prompt_date()?;

        clear_screen()?;
        println!("\nQuerying stock {code} ...");
        self.client.query_and_display(&code, &date);

        wait_for_enter()
    }

    fn batch_query(&self) -> Result<()> {
        clear_screen()?;
        println!("\n[Watch-list batch query]");

        let entries = match watchlist::load(self.watchlist_path) {
            Ok(entries) => entries,
            Err(err) => {
                // Fatal for this run only; back to the menu.
                eprintln!("cannot load watch list: {err}");
                return wait_for_enter();
            }
        };
        println!("Loaded {} stocks\n", entries.len());

        let date = prompt_date()?;

        clear_screen()?;
        println!("\nQuerying watch-list stocks ...");
        let report = batch::run(self.client, &entries, &date, self.delay);
        println!(
            "\nDone: {} / {} queries succeeded\n",
            report.succeeded,
            report.total()
        );

        wait_for_enter()
    }
}

/// Offer today's date, let the user type another one.
fn prompt_date() -> Result<String> {
    let date = today_gregorian();
    println!("Using date: {date} (format: YYYYMMDD)");
    print!("Enter another date, or press Enter to keep it: ");
    io::stdout().flush()?;

    let input = read_line()?;
    let input = input.trim();
    if input.is_empty() {
        Ok(date)
    } else {
        Ok(input.to_string())
    }
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn wait_for_enter() -> Result<()> {
    print!("\nPress Enter to return to the menu");
    io::stdout().flush()?;
    read_line()?;
    Ok(())
}

fn clear_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}
