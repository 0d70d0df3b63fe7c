use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use folio::build::build_site;
use folio::config::Config;
use folio::index::ContentIndex;
use folio::{markdown, search, toc};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn main() {
    let matches = app().get_matches();
    let verbosity = match matches.subcommand() {
        (_, Some(sub)) => matches
            .occurrences_of("verbose")
            .max(sub.occurrences_of("verbose")),
        _ => matches.occurrences_of("verbose"),
    };
    folio::logging::init(verbosity);
    if let Err(e) = run(&matches) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    let slug = || {
        Arg::with_name("slug")
            .required(true)
            .help("The document's slug (its file name without extension)")
    };

    App::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Queries a Markdown blog's content and generates its feeds")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .takes_value(true)
                .global(true)
                .help("The directory to search for `folio.yaml` (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .global(true)
                .help("Increases logging verbosity"),
        )
        .subcommand(SubCommand::with_name("posts").about("Lists every post, most recent first"))
        .subcommand(
            SubCommand::with_name("post")
                .about("Shows a single post")
                .arg(slug())
                .arg(
                    Arg::with_name("html")
                        .long("html")
                        .help("Prints the rendered body instead of the JSON document"),
                ),
        )
        .subcommand(SubCommand::with_name("projects").about("Lists every project"))
        .subcommand(
            SubCommand::with_name("project")
                .about("Shows a single project")
                .arg(slug()),
        )
        .subcommand(SubCommand::with_name("tags").about("Lists tags with their post counts"))
        .subcommand(
            SubCommand::with_name("categories").about("Lists categories with their post counts"),
        )
        .subcommand(
            SubCommand::with_name("tag")
                .about("Lists the posts with a tag")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(
            SubCommand::with_name("category")
                .about("Lists the posts in a category")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(
            SubCommand::with_name("series")
                .about("Shows the posts of a series in reading order")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(
            SubCommand::with_name("adjacent")
                .about("Shows the older and more recent neighbours of a post")
                .arg(slug()),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Searches post titles, descriptions, and tags")
                .arg(Arg::with_name("query").multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("toc")
                .about("Prints the table of contents of a post")
                .arg(slug()),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Writes the feeds, sitemap, robots.txt and search corpus")
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .default_value("public")
                        .help("The output directory"),
                ),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let project = matches
        .subcommand()
        .1
        .and_then(|sub| sub.value_of("project"))
        .or_else(|| matches.value_of("project"))
        .unwrap_or(".");
    let config = Config::from_directory(&PathBuf::from(project))?;
    let index = ContentIndex::new(&config.content_directory);

    match matches.subcommand() {
        ("posts", Some(_)) => print(&index.posts()),
        ("post", Some(m)) => {
            let slug = arg(m, "slug")?;
            let post = index
                .post(slug)
                .ok_or_else(|| anyhow!("No post `{}`", slug))?;
            if m.is_present("html") {
                println!("{}", markdown::to_html(&post.body));
                Ok(())
            } else {
                print(&post)
            }
        }
        ("projects", Some(_)) => print(&index.projects()),
        ("project", Some(m)) => {
            let slug = arg(m, "slug")?;
            print(&index.project(slug).ok_or_else(|| anyhow!("No project `{}`", slug))?)
        }
        ("tags", Some(_)) => print(&index.all_tags()),
        ("categories", Some(_)) => print(&index.all_categories()),
        ("tag", Some(m)) => print(&index.posts_by_tag(arg(m, "name")?)),
        ("category", Some(m)) => print(&index.posts_by_category(arg(m, "name")?)),
        ("series", Some(m)) => {
            let name = arg(m, "name")?;
            print(
                &index
                    .series_by_name(name)
                    .ok_or_else(|| anyhow!("No series `{}`", name))?,
            )
        }
        ("adjacent", Some(m)) => print(&index.adjacent_posts(arg(m, "slug")?)),
        ("search", Some(m)) => {
            let query = m.values_of("query").map(|v| v.collect::<Vec<_>>().join(" "));
            print(&search::search(query.as_deref().unwrap_or(""), &index.posts()))
        }
        ("toc", Some(m)) => {
            let slug = arg(m, "slug")?;
            let post = index
                .post(slug)
                .ok_or_else(|| anyhow!("No post `{}`", slug))?;
            print(&toc::extract_headings(&post.body))
        }
        ("build", Some(m)) => {
            let output = Path::new(m.value_of("output").unwrap_or("public"));
            build_site(&config, output)?;
            Ok(())
        }
        (name, _) => Err(anyhow!("Unknown command `{}`", name)),
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| anyhow!("Missing argument `{}`", name))
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
