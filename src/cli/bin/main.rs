use std::env;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, Command};
use dotenv::dotenv;

use sweatlog::dialog::{AutoConfirm, ConsoleNotifier, FieldForm, FormIntent, StdinConfirm};
use sweatlog::model::Workout;
use sweatlog::service::WorkoutService;
use sweatlog::table::SortColumn;
use sweatlog::view::WorkoutListView;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let base_url: String = env::var("BASE_URL").context("BASE_URL env var must be set!")?;

    let matches = Command::new("sweatlog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A workout-tracking command line client.")
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .action(ArgAction::SetTrue)
                .help("List all workouts."),
        )
        .arg(
            Arg::new("filter")
                .short('f')
                .long("filter")
                .value_name("text")
                .help("Use with '-l'. Only show rows containing the text."),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .value_name("column")
                .help("Use with '-l'. Sort by sport, description, date, end_date or location."),
        )
        .arg(
            Arg::new("page")
                .long("page")
                .value_name("n")
                .help("Use with '-l'. Page of the listing to print, starting at 1."),
        )
        .arg(
            Arg::new("add")
                .short('a')
                .long("add")
                .value_name("sport|description|start|end|location")
                .help("Add a new workout. Times as 'YYYY-MM-DD HH:MM:SS'."),
        )
        .arg(
            Arg::new("edit")
                .short('e')
                .long("edit")
                .value_name("id|sport|description|start|end|location")
                .help("Edit a workout. Empty fields keep their current value."),
        )
        .arg(
            Arg::new("delete")
                .short('d')
                .long("delete")
                .value_name("id")
                .help("Delete a workout."),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .action(ArgAction::SetTrue)
                .help("Use with '-d'. Skip the confirmation prompt."),
        )
        .get_matches();

    let service = WorkoutService::new(base_url);
    let mut view = WorkoutListView::new(service, ConsoleNotifier);

    if let Some(fields) = matches.get_one::<String>("add") {
        let mut form = FieldForm::new(fields);
        if view.open_form(&mut form, FormIntent::Add).await {
            println!("Workout saved.");
        } else {
            eprintln!("Nothing saved.");
        }
        return Ok(());
    }

    if let Some(raw) = matches.get_one::<String>("edit") {
        let (id_part, fields) = raw
            .split_once('|')
            .ok_or_else(|| anyhow!("edit expects 'id|sport|description|start|end|location'"))?;
        let id: i64 = id_part.parse().context("edit id must be an integer")?;

        if !view.load().await {
            std::process::exit(1);
        }

        let selected = match find_workout(view.workouts(), id) {
            Some(workout) => workout,
            None => {
                eprintln!("No workout with id {}.", id);
                std::process::exit(1);
            }
        };

        let mut form = FieldForm::new(fields);
        if view.open_form(&mut form, FormIntent::Edit(selected)).await {
            println!("Workout updated.");
        } else {
            eprintln!("Nothing updated.");
        }
        return Ok(());
    }

    if let Some(raw) = matches.get_one::<String>("delete") {
        let id: i64 = raw.parse().context("delete id must be an integer")?;

        if !view.load().await {
            std::process::exit(1);
        }

        let target = match find_workout(view.workouts(), id) {
            Some(workout) => workout,
            None => {
                eprintln!("No workout with id {}.", id);
                std::process::exit(1);
            }
        };

        let deleted = if matches.get_flag("yes") {
            view.delete_workout(&mut AutoConfirm(true), &target).await
        } else {
            view.delete_workout(&mut StdinConfirm, &target).await
        };

        if deleted {
            println!("Workout deleted.");
        }
        return Ok(());
    }

    if matches.get_flag("list") {
        if !view.load().await {
            std::process::exit(1);
        }

        if let Some(text) = matches.get_one::<String>("filter") {
            view.apply_filter(text);
        }

        if let Some(column) = matches.get_one::<String>("sort") {
            view.table_mut().toggle_sort(parse_sort_column(column)?);
        }

        if let Some(page) = matches.get_one::<String>("page") {
            let page: usize = page.parse().context("page must be a positive integer")?;
            view.table_mut().set_page(page.saturating_sub(1));
        }

        view.table().render().printstd();
    }

    Ok(())
}

fn find_workout(workouts: &[Workout], id: i64) -> Option<Workout> {
    workouts.iter().find(|w| w.id == Some(id)).cloned()
}

fn parse_sort_column(column: &str) -> Result<SortColumn> {
    match column {
        "sport" => Ok(SortColumn::Sport),
        "description" => Ok(SortColumn::Description),
        "date" => Ok(SortColumn::Date),
        "end_date" => Ok(SortColumn::EndDate),
        "location" => Ok(SortColumn::LocationName),
        _ => Err(anyhow!("unknown sort column: {}", column)),
    }
}
