//! Interactive terminal game loop.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use fourcolor_core::{
    render_board, ComputeBackend, Difficulty, PaletteColor, Point, RenderOptions, Session,
};

use crate::hall_of_fame::HallOfFame;

/// Widest ASCII map printed by `show`
const MAP_COLUMNS: usize = 80;

const HELP: &str = "\
Commands:
  1-4 | color <c>       select red, green, blue or yellow
  paint <x> <y>        paint the region under a point (alias: click)
  fill <i> [color]     paint region i by index
  regions              list regions, paint, conflicts and neighbors
  show                 print the board as text
  save <file.png>      write the board to an image
  easy | medium | hard new board at that difficulty
  restart              new board at the current difficulty (alias: r)
  status               progress summary
  help                 this text
  quit                 leave the game (alias: q)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(PaletteColor),
    Paint(Point),
    Fill(usize, Option<PaletteColor>),
    Regions,
    Show,
    Save(PathBuf),
    SetDifficulty(Difficulty),
    Restart,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let head = parts.next().ok_or_else(|| "empty command".to_string())?;
        let args: Vec<&str> = parts.collect();
        let head = head.to_ascii_lowercase();

        let int = |s: &str, what: &str| -> Result<i64, String> {
            s.parse::<i64>()
                .map_err(|_| format!("invalid {} '{}'", what, s))
        };

        match (head.as_str(), args.as_slice()) {
            ("1" | "2" | "3" | "4", []) => Ok(Command::Select(head.parse()?)),
            ("color" | "c", [color]) => Ok(Command::Select(color.parse()?)),
            ("paint" | "click", [x, y]) => {
                let x = int(*x, "x")?;
                let y = int(*y, "y")?;
                let x = i32::try_from(x).map_err(|_| format!("x out of range: {}", x))?;
                let y = i32::try_from(y).map_err(|_| format!("y out of range: {}", y))?;
                Ok(Command::Paint(Point::new(x, y)))
            }
            ("fill", [index]) => Ok(Command::Fill(parse_index(index)?, None)),
            ("fill", [index, color]) => {
                Ok(Command::Fill(parse_index(index)?, Some(color.parse()?)))
            }
            ("regions" | "list", []) => Ok(Command::Regions),
            ("show" | "map", []) => Ok(Command::Show),
            ("save", [path]) => Ok(Command::Save(PathBuf::from(*path))),
            ("easy" | "medium" | "hard", []) => Ok(Command::SetDifficulty(head.parse()?)),
            ("difficulty", [level]) => Ok(Command::SetDifficulty(level.parse()?)),
            ("restart" | "r", []) => Ok(Command::Restart),
            ("status", []) => Ok(Command::Status),
            ("help" | "?", []) => Ok(Command::Help),
            ("quit" | "q" | "exit", []) => Ok(Command::Quit),
            _ => Err(format!("unrecognized command '{}' (type 'help')", line.trim())),
        }
    }
}

fn parse_index(s: &str) -> Result<usize, String> {
    s.parse().map_err(|_| format!("invalid region index '{}'", s))
}

/// How a game loop ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Won(Duration),
    Quit,
}

/// Drive `session` from line-based `input` until a win, `quit` or EOF.
/// On a win the player is asked for a name on the same input.
pub fn run<B: ComputeBackend, R: BufRead>(
    session: &mut Session<B>,
    mut input: R,
    hall: &HallOfFame,
    options: RenderOptions,
) -> anyhow::Result<Outcome> {
    println!("{}", HELP);
    print_status(session);
    let mut started = Instant::now();
    let mut line = String::new();

    loop {
        print!("[{}] > ", session.selected_color().name());
        std::io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!();
            return Ok(Outcome::Quit);
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Select(color) => session.select_color(color),
            Command::Paint(p) => match session.paint_at(p) {
                Some(index) => report_paint(session, index),
                None => println!("board is finished"),
            },
            Command::Fill(index, color) => {
                let color = color.unwrap_or(session.selected_color());
                if session.paint_region(index, Some(color)) {
                    report_paint(session, index);
                } else {
                    println!("no region {} (board has {})", index, session.regions().len());
                }
            }
            Command::Regions => print_regions(session),
            Command::Show => print_map(session),
            Command::Save(path) => {
                let image =
                    render_board(session.field(), session.regions(), session.adjacency(), options);
                match image.save(&path) {
                    Ok(()) => println!("Board saved to: {:?}", path),
                    Err(e) => println!("failed to save board to {:?}: {}", path, e),
                }
            }
            Command::SetDifficulty(difficulty) => {
                session.set_difficulty(difficulty)?;
                started = Instant::now();
                print_status(session);
            }
            Command::Restart => {
                session.restart()?;
                started = Instant::now();
                print_status(session);
            }
            Command::Status => print_status(session),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Outcome::Quit),
        }

        if session.poll_win() {
            let elapsed = started.elapsed();
            println!("You win! Time: {:.2} seconds", elapsed.as_secs_f64());
            save_result(&mut input, hall, elapsed)?;
            return Ok(Outcome::Won(elapsed));
        }
    }
}

fn save_result<R: BufRead>(
    input: &mut R,
    hall: &HallOfFame,
    elapsed: Duration,
) -> anyhow::Result<()> {
    print!("Enter your name to save the result to the hall of fame: ");
    std::io::stdout().flush()?;
    let mut name = String::new();
    input.read_line(&mut name)?;
    if hall.append(&name, elapsed)? {
        println!("Saved to {:?}", hall.path());
    }
    Ok(())
}

fn report_paint<B: ComputeBackend>(session: &Session<B>, index: usize) {
    let region = &session.regions()[index];
    let color = region.paint.map_or("none", |c| c.name());
    if session.has_conflict(index) {
        let clashes: Vec<usize> = session
            .adjacency()
            .neighbors(index)
            .filter(|&j| session.regions().get(j).is_some_and(|r| r.paint == region.paint))
            .collect();
        println!("region {} -> {} (conflicts with {:?})", index, color, clashes);
    } else {
        println!("region {} -> {}", index, color);
    }
}

fn print_status<B: ComputeBackend>(session: &Session<B>) {
    println!(
        "{} board: {} regions, {} painted, {} in conflict, {} borders",
        session.difficulty().name(),
        session.regions().len(),
        session.painted_count(),
        session.conflicts().len(),
        session.adjacency().edge_count(),
    );
}

fn print_regions<B: ComputeBackend>(session: &Session<B>) {
    println!("{:>4} {:>11} {:>7} {:>8}  neighbors", "id", "seed", "color", "conflict");
    for (i, region) in session.regions().iter().enumerate() {
        let neighbors: Vec<usize> = session.adjacency().neighbors(i).collect();
        println!(
            "{:>4} {:>11} {:>7} {:>8}  {:?}",
            i,
            format!("({},{})", region.seed.x, region.seed.y),
            region.paint.map_or("-", |c| c.name()),
            if session.has_conflict(i) { "yes" } else { "" },
            neighbors,
        );
    }
}

/// Map glyph for a region: palette initial, lowercase when conflicting
fn glyph<B: ComputeBackend>(session: &Session<B>, index: usize) -> char {
    let Some(color) = session.regions()[index].paint else {
        return '.';
    };
    let c = match color {
        PaletteColor::Red => 'R',
        PaletteColor::Green => 'G',
        PaletteColor::Blue => 'B',
        PaletteColor::Yellow => 'Y',
    };
    if session.has_conflict(index) {
        c.to_ascii_lowercase()
    } else {
        c
    }
}

/// Downsampled text rendering; border cells are drawn as '+'
pub fn ascii_map<B: ComputeBackend>(session: &Session<B>) -> Vec<String> {
    let field = session.field();
    let grid = &field.grid;
    let step = grid.cols.div_ceil(MAP_COLUMNS).max(1);
    // terminal cells are about twice as tall as wide
    let row_step = step * 2;

    (0..grid.rows)
        .step_by(row_step)
        .map(|row| {
            (0..grid.cols)
                .step_by(step)
                .map(|col| {
                    if field.is_boundary(col, row) {
                        '+'
                    } else {
                        glyph(session, field.region_at(col, row))
                    }
                })
                .collect()
        })
        .collect()
}

fn print_map<B: ComputeBackend>(session: &Session<B>) {
    for line in ascii_map(session) {
        println!("{}", line);
    }
}
