use std::env;
use std::fs;
use std::io::{self, BufRead, Read, Write};

use luawalk::{stdlib, LuaInterpreter, LuaValue};

const VERSION: &str = "luawalk 0.1 (Lua 5.1 compatible)";

fn print_usage() {
    eprintln!("usage: luawalk [options] [script [args]]");
    eprintln!("Available options are:");
    eprintln!("  -e stat   execute string 'stat'");
    eprintln!("  -i        enter interactive mode after executing 'script'");
    eprintln!("  -v        show version information");
    eprintln!("  --        stop handling options");
    eprintln!("  -         stop handling options and execute stdin");
}

#[derive(Default)]
struct Options {
    execute_strings: Vec<String>,
    interactive: bool,
    script_file: Option<String>,
    script_args: Vec<String>,
    show_version: bool,
    read_stdin: bool,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::default();
    let mut i = 1;
    let mut stop_options = false;

    while i < args.len() {
        let arg = &args[i];
        if !stop_options && arg.starts_with('-') && arg.len() > 1 {
            match arg.as_str() {
                "-e" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("'-e' needs argument".to_string());
                    }
                    opts.execute_strings.push(args[i].clone());
                }
                "-i" => opts.interactive = true,
                "-v" => opts.show_version = true,
                "--" => stop_options = true,
                _ => return Err(format!("unrecognized option '{}'", arg)),
            }
        } else if arg == "-" {
            opts.read_stdin = true;
            stop_options = true;
        } else {
            opts.script_file = Some(arg.clone());
            opts.script_args = args[i + 1..].to_vec();
            break;
        }
        i += 1;
    }

    Ok(opts)
}

struct Session {
    interp: LuaInterpreter,
    scope: luawalk::Scope,
}

impl Session {
    fn new(script_name: Option<&str>, script_args: &[String]) -> Self {
        let mut interp = LuaInterpreter::new();
        let scope = interp.new_root_scope();
        stdlib::open_libs(&mut interp, &scope);

        // arg[0] = script name, arg[1..] = script arguments.
        let arg_table = interp.create_table();
        if let Some(name) = script_name {
            arg_table.borrow_mut().set_int(0, LuaValue::str(name));
        }
        for (i, a) in script_args.iter().enumerate() {
            arg_table
                .borrow_mut()
                .set_int(i as i64 + 1, LuaValue::str(a));
        }
        scope.set_local("arg", LuaValue::table_ref(arg_table));

        Session { interp, scope }
    }

    fn run(&mut self, source: &str, chunk_name: &str) -> Result<(), String> {
        self.interp
            .execute_string(source, &self.scope)
            .map(|_| ())
            .map_err(|e| format!("{}: {}", chunk_name, e))
    }
}

fn run_repl(session: &mut Session) {
    println!("{}", VERSION);
    println!("Type 'exit' or Ctrl+D to leave\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut incomplete = String::new();

    loop {
        if incomplete.is_empty() {
            print!("> ");
        } else {
            print!(">> ");
        }
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };

        let trimmed = line.trim();
        if incomplete.is_empty() && (trimmed == "exit" || trimmed == "quit") {
            break;
        }

        if !incomplete.is_empty() {
            incomplete.push('\n');
        }
        incomplete.push_str(&line);

        // Try as an expression first so `1 + 2` prints its value.
        let expr_code = format!("return {}", incomplete);
        let code = if session.interp.compile(&expr_code).is_ok() {
            expr_code
        } else {
            incomplete.clone()
        };

        match session.interp.compile(&code) {
            Ok(block) => {
                match session.interp.execute(&block, &session.scope) {
                    Ok(results) => {
                        if !results.is_empty() && !results.first().is_nil() {
                            let rendered: Vec<String> =
                                results.iter().map(|v| format!("{:?}", v)).collect();
                            println!("{}", rendered.join("\t"));
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
                incomplete.clear();
            }
            Err(e) => {
                // Keep accumulating while the input still looks incomplete.
                let message = e.to_string();
                if message.contains("expected") && !message.contains("unexpected") {
                    continue;
                }
                eprintln!("{}", e);
                incomplete.clear();
            }
        }
    }
}

fn main() {
    env_logger::init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("luawalk: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if opts.show_version {
        println!("{}", VERSION);
        if opts.execute_strings.is_empty() && opts.script_file.is_none() && !opts.read_stdin {
            return;
        }
    }

    let mut session = Session::new(opts.script_file.as_deref(), &opts.script_args);

    for code in &opts.execute_strings {
        if let Err(e) = session.run(code, "command line") {
            eprintln!("luawalk: {}", e);
            std::process::exit(1);
        }
    }

    if let Some(filename) = &opts.script_file {
        let source = match fs::read_to_string(filename) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("luawalk: cannot open {}: {}", filename, e);
                std::process::exit(1);
            }
        };
        if let Err(e) = session.run(&source, filename) {
            eprintln!("luawalk: {}", e);
            std::process::exit(1);
        }
    } else if opts.read_stdin {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("luawalk: error reading stdin: {}", e);
            std::process::exit(1);
        }
        if let Err(e) = session.run(&source, "stdin") {
            eprintln!("luawalk: {}", e);
            std::process::exit(1);
        }
    }

    if opts.interactive
        || (opts.execute_strings.is_empty() && opts.script_file.is_none() && !opts.read_stdin)
    {
        run_repl(&mut session);
    }
}
