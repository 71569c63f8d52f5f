//! Pixelcodec CLI
//!
//! Usage:
//!   pixelcodec demo --output demo.png
//!   pixelcodec info demo.png
//!   pixelcodec put cover.png "hello" --output stash.png
//!   pixelcodec get stash.png
//!
//! Logging diatur lewat `RUST_LOG` (default: info).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{ensure, Context};
use clap::{Parser, Subcommand};
use image::RgbImage;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixelcodec::core::load_png;
use pixelcodec::{Decode, Encode, ImgHandler, MmapSurface, Result, Surface};

#[derive(Debug, Parser)]
#[command(name = "pixelcodec", version, about = "Store typed values in the channel bytes of an image")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the sample stream, save it, reload it and read everything back
    Demo {
        #[arg(short, long, default_value = "demo.png")]
        output: PathBuf,
        #[arg(long, default_value_t = 50)]
        width: u32,
        #[arg(long, default_value_t = 50)]
        height: u32,
        /// Seed for the 500 pseudo-random integers
        #[arg(long, default_value_t = 0x5EED)]
        seed: u64,
    },
    /// Print dimensions and byte capacity of a surface
    Info { path: PathBuf },
    /// Write one string at offset 0 and save
    Put {
        path: PathBuf,
        text: String,
        /// Defaults to overwriting `path`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read one string from offset 0
    Get { path: PathBuf },
}

/// Player contoh: (i32 x, i32 y, i32 health, string name)
#[derive(Debug, Clone, PartialEq)]
struct Player {
    x: i32,
    y: i32,
    health: i32,
    name: String,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            health: 100,
            name: "Jonny Razer".to_string(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PLAYER[{:?}](x: {}, y: {}, health: {})",
            self.name, self.x, self.y, self.health
        )
    }
}

impl Encode for Player {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler
            .write_i32(self.x)?
            .write_i32(self.y)?
            .write_i32(self.health)?
            .write_string(&self.name)?;
        Ok(())
    }
}

impl Decode for Player {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        Ok(Self {
            x: handler.read_i32()?,
            y: handler.read_i32()?,
            health: handler.read_i32()?,
            name: handler.read_string()?,
        })
    }
}

/// Deterministic LCG supaya demo bisa diulang
fn pseudo_random(seed: u64, count: usize) -> Vec<i64> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            state as i64
        })
        .collect()
}

fn is_ppm(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"))
}

/// `.ppm` di-mmap, format lain di-load sebagai RGB8
fn open_surface(path: &Path) -> Result<Box<dyn Surface>> {
    if is_ppm(path) {
        Ok(Box::new(MmapSurface::open(path)?))
    } else {
        Ok(Box::new(load_png(path)?))
    }
}

fn run_demo(output: &Path, width: u32, height: u32, seed: u64) -> anyhow::Result<()> {
    println!("🖼  Pixelcodec demo ({}x{}, {} bytes)", width, height, width as usize * height as usize * 3);
    println!("====================================\n");

    let simple_player = Player {
        x: 600,
        y: 784,
        health: 48,
        name: "Mega man".to_string(),
    };
    let default_player = Player::default();
    let small_list: Vec<i64> = vec![0, 255, 512, 1024, 2048, -1];
    let players = vec![default_player.clone(), simple_player.clone()];
    let big_list = pseudo_random(seed, 500);
    let motto = "My Very Eager Mother Just Made Us Nachos";

    let start = Instant::now();
    let mut surface: Box<dyn Surface> = if is_ppm(output) {
        Box::new(MmapSurface::create(output, width, height)?)
    } else {
        Box::new(RgbImage::new(width, height))
    };
    let written = {
        let mut handler = ImgHandler::new(&mut *surface);
        handler
            .write_string("Gaming Town")?
            .write_i64(22)?
            .write_string(motto)?
            .write_i32(9925)?
            .write_object(&simple_player)?
            .write_object(&default_player)?
            .write_list(&small_list)?
            .write_list(&players)?
            .write_list(&big_list)?
            .save_file(output)?;
        handler.offset()
    };
    info!(bytes = written, path = %output.display(), elapsed = ?start.elapsed(), "stream written");
    drop(surface);

    let mut loaded = open_surface(output).with_context(|| format!("reopening {}", output.display()))?;
    let mut reader = ImgHandler::new(&mut *loaded);
    println!("{}", reader.width());
    println!("{}\n", reader.height());

    let town = reader.read_string()?;
    let number = reader.read_i64()?;
    let sentence = reader.read_string()?;
    let small = reader.read_i32()?;
    let first: Player = reader.read_object()?;
    let second: Player = reader.read_object()?;
    let read_small: Vec<i64> = reader.read_next()?;
    let read_players: Vec<Player> = reader.read_next()?;
    let read_big: Vec<i64> = reader.read_next()?;

    println!("{}", town);
    println!("{}", number);
    println!("{}", sentence);
    println!("{}", small);
    println!("{}", first);
    println!("{}", second);
    println!("{:?}", read_small);
    println!("{:?}", read_players.iter().map(ToString::to_string).collect::<Vec<_>>());
    println!("{:?}", &read_big[..read_big.len().min(30)]);

    ensure!(town == "Gaming Town" && number == 22, "header values differ");
    ensure!(sentence == motto && small == 9925, "scalar values differ");
    ensure!(first == simple_player && second == default_player, "players differ");
    ensure!(read_small == small_list && read_players == players, "lists differ");
    ensure!(read_big == big_list, "random list differs");
    ensure!(reader.offset() == written, "read {} bytes, wrote {}", reader.offset(), written);

    println!("\n✅ Round-trip verified: {} bytes", written);
    Ok(())
}

fn main_entry() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Demo {
            output,
            width,
            height,
            seed,
        } => run_demo(&output, width, height, seed),
        Command::Info { path } => {
            let surface = open_surface(&path)?;
            println!("path:     {}", path.display());
            println!("width:    {}", surface.width());
            println!("height:   {}", surface.height());
            println!("capacity: {} bytes", surface.capacity());
            Ok(())
        }
        Command::Put { path, text, output } => {
            let mut surface = open_surface(&path)?;
            let output = output.unwrap_or_else(|| path.clone());
            let mut handler = ImgHandler::new(&mut *surface);
            handler.write_string(&text)?.save_file(&output)?;
            info!(bytes = handler.offset(), path = %output.display(), "stored text");
            Ok(())
        }
        Command::Get { path } => {
            let mut surface = open_surface(&path)?;
            let mut reader = ImgHandler::new(&mut *surface);
            println!("{}", reader.read_string()?);
            Ok(())
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = main_entry() {
        eprintln!("pixelcodec: {e:#}");
        std::process::exit(1);
    }
}
