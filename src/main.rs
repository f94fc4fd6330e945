use clap::{arg, crate_version, Command};
use hcs::{build, io, parents, Hcs};
use std::time::Instant;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help = "Examples:
---------
Sort ascending: `hcs sort-asc -i colors.bin -o colors.sorted.bin`
Find parents:   `hcs find-parents -i colors.sorted.bin -o parents.bin`
Build:          `hcs build -s colors.sorted.bin -p parents.bin -d 8 -o colors.hcs`
Extract:        `hcs extract -i colors.hcs -n 42`
Benchmark:      `hcs bench -i colors.hcs -n 100000`";

    let mut main_cmd = Command::new("hcs")
        .about("Build and query Hierarchical Color-Set representations")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("sort-asc")
            .arg(arg!(-i --input <PATH> "input color-set file").required(true))
            .arg(arg!(-o --output <PATH> "output color-set file").required(true))
            .about("sort color sets by ascending cardinality"),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("find-parents")
            .arg(arg!(-i --input <PATH> "ascending-sorted color-set file").required(true))
            .arg(arg!(-o --output <PATH> "output parent file").required(true))
            .arg(arg!(-t --threads <N> "worker count for the parent scan, 0 = rayon default").required(false))
            .about("find a candidate ancestor for each color set"),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("build")
            .arg(arg!(-s --sets <PATH> "ascending-sorted color-set file").required(true))
            .arg(arg!(-p --parents <PATH> "parent file").required(true))
            .arg(arg!(-d --depth <N> "maximum subset chain depth").required(true))
            .arg(arg!(-o --output <PATH> "output HCS file").required(true))
            .about("apply the depth limit, plan the layout, and serialize an HCS"),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("extract")
            .arg(arg!(-i --input <PATH> "HCS file").required(true))
            .arg(arg!(-n --index <N> "set index to extract").required(true))
            .about("decode one set from an HCS file"),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("bench")
            .arg(arg!(-i --input <PATH> "HCS file").required(true))
            .arg(arg!(-n --accesses <N> "number of random extracts").required(true))
            .about("benchmark random-access extract"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("sort-asc") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let sets = io::read_color_sets(path_in)?;
        let sorted = io::sort_ascending(sets);
        io::write_color_sets(path_out, &sorted)?;
    }

    if let Some(cmd) = matches.subcommand_matches("find-parents") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let num_threads: usize = match cmd.get_one::<String>("threads") {
            Some(s) => s.parse()?,
            None => 0,
        };
        let sets = io::read_color_sets(path_in)?;
        log::info!("computing parents for {} sets (threads={num_threads})", sets.len());
        let ancestor = parents::find_parents_with_threads(&sets, num_threads);
        io::write_parents(path_out, &ancestor)?;
    }

    if let Some(cmd) = matches.subcommand_matches("build") {
        let path_sets = cmd.get_one::<String>("sets").expect(RCH);
        let path_parents = cmd.get_one::<String>("parents").expect(RCH);
        let depth_limit: i64 = cmd.get_one::<String>("depth").expect(RCH).parse()?;
        let path_out = cmd.get_one::<String>("output").expect(RCH);

        let sets = io::read_color_sets(path_sets)?;
        let ancestor = io::read_parents(path_parents)?;
        log::info!("depth limit: {depth_limit}");

        let (h, _mapping) = build::build_from_ancestors(&sets, ancestor, depth_limit)?;
        log::info!("size in bytes: {}", h.size_in_bytes());
        std::fs::write(path_out, h.to_bytes())?;
    }

    if let Some(cmd) = matches.subcommand_matches("extract") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let index: usize = cmd.get_one::<String>("index").expect(RCH).parse()?;
        let bytes = std::fs::read(path_in)?;
        let h = Hcs::from_bytes(&bytes)?;
        let set = h.extract(index)?;
        println!("{set:?}");
    }

    if let Some(cmd) = matches.subcommand_matches("bench") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let accesses: usize = cmd.get_one::<String>("accesses").expect(RCH).parse()?;
        let bytes = std::fs::read(path_in)?;
        let h = Hcs::from_bytes(&bytes)?;
        let size = h.size().max(1);

        // xorshift64, deterministic and dependency-free: good enough to
        // scatter sampling positions for a timing loop.
        let mut state: u64 = 0x9E3779B97F4A7C15;
        let mut x: u32 = 0;
        let start = Instant::now();
        for _ in 0..accesses {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let pos = (state as usize) % size;
            let res = h.extract(pos)?;
            if let Some(&last) = res.last() {
                x ^= last;
            }
        }
        let duration = start.elapsed();
        println!("x: {x}");
        println!("{accesses} accesses took: {duration:?}");
        println!("average time per access: {:?}", duration / accesses.max(1) as u32);
    }

    Ok(())
}
