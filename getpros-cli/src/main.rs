use clap::{Args, Parser, Subcommand};
use getpros_core::{
    ClientConfig, CompanyRegistrationForm, Controls, FrappeClient, GridAdapter, LoginForm,
    PageLink, PageRequest, SignupForm, Trainer, TrainerFilter, Validate, ViewAll, format_inr,
    quote,
};

#[derive(Parser)]
#[command(name = "getpros-cli")]
#[command(about = "Browse Get Pros trainers and check marketplace forms from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the page-link row for a list of a given size
    Pages {
        /// Number of items in the list
        total_items: usize,
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Items per page
        #[arg(long, default_value = "8")]
        page_size: usize,
        /// Neighbouring pages shown around the current one
        #[arg(long, default_value = "2")]
        delta: usize,
    },
    /// List trainers from the marketplace backend
    Trainers {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Fetch everything once and paginate locally
        #[arg(long)]
        client_side: bool,
        /// Only show the preview window with a "view all" link
        #[arg(long)]
        preview: bool,
    },
    /// Run a form validator against field values
    Validate {
        #[command(subcommand)]
        form: FormCommand,
    },
    /// Quote a credit purchase
    Credits {
        /// Number of credits wanted
        credits: u32,
        /// Place the order with the backend after quoting
        #[arg(long)]
        order: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Free text over name, headline and expertise
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long)]
    expertise: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    min_rating: Option<f32>,
    /// Maximum hourly rate in rupees
    #[arg(long)]
    max_rate: Option<f64>,
}

impl From<FilterArgs> for TrainerFilter {
    fn from(args: FilterArgs) -> Self {
        TrainerFilter {
            query: args.query,
            expertise: args.expertise,
            city: args.city,
            min_rating: args.min_rating,
            max_hourly_rate: args.max_rate,
        }
    }
}

#[derive(Subcommand)]
enum FormCommand {
    Signup {
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        confirm_password: String,
    },
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    Company {
        #[arg(long, default_value = "")]
        company_name: String,
        #[arg(long, default_value = "")]
        website: String,
        #[arg(long, default_value = "")]
        contact_email: String,
        #[arg(long)]
        employee_count: Option<u32>,
    },
}

fn render_controls(controls: &Controls) {
    match controls {
        Controls::None => {}
        Controls::ViewAll(view_all) => println!("{} -> {}", view_all.label, view_all.href),
        Controls::Pages(pages) => {
            let links: Vec<String> = pages
                .links
                .iter()
                .map(|link| match link {
                    PageLink::Page(n) if *n == pages.current_page => format!("[{}]", n),
                    other => other.to_string(),
                })
                .collect();
            let prev = if pages.has_prev() { "‹" } else { " " };
            let next = if pages.has_next() { "›" } else { " " };
            println!("{} {} {}", prev, links.join(" "), next);
            println!("{}", pages.summary());
        }
    }
}

fn render_trainer(position: usize, trainer: &Trainer) {
    let rate = trainer
        .hourly_rate
        .map(|r| format!("₹{:.0}/h", r))
        .unwrap_or_else(|| "rate on request".to_string());
    let rating = trainer
        .rating
        .map(|r| format!("{:.1}★", r))
        .unwrap_or_else(|| "new".to_string());
    println!(
        "  {}. {} ({}) - {} - {} [{}]",
        position,
        trainer.full_name,
        trainer.city.as_deref().unwrap_or("remote"),
        rate,
        rating,
        trainer.expertise.join(", ")
    );
}

/// A preview always shows the first page, whatever was asked for
fn requested_page(page: usize, preview: bool) -> usize {
    if preview { 1 } else { page }
}

async fn list_trainers(
    filter: TrainerFilter,
    page: usize,
    client_side: bool,
    preview: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = requested_page(page, preview);
    let config = ClientConfig::load()?;
    let client = FrappeClient::new(&config)?;
    let page_size = if preview {
        config.preview_size
    } else {
        config.page_size
    };
    let view_all = ViewAll::new("View all trainers", "getpros-cli trainers");

    if client_side {
        let all = client.fetch_all_trainers(&TrainerFilter::default()).await?;
        let matched = filter.apply(&all);

        let mut grid = GridAdapter::client(page_size);
        if preview {
            grid = grid.locked(view_all);
        }
        grid.on_page_change(&matched, page);

        let view = grid.view(&matched);
        println!("Found {} trainers:", matched.len());
        let first = if preview {
            1
        } else {
            (grid.current_page() - 1) * page_size + 1
        };
        for (i, trainer) in view.items.iter().enumerate() {
            render_trainer(first + i, trainer);
        }
        render_controls(&view.controls);
    } else {
        let fetched = client
            .fetch_trainers(PageRequest::new(page, page_size), &filter)
            .await?;

        let mut grid = GridAdapter::server(fetched.request, |request: PageRequest| {
            log::info!(
                "Fetch page {} with: getpros-cli trainers --page {}",
                request.page,
                request.page
            );
        });
        if preview {
            grid = grid.locked(view_all);
        }

        let view = grid.view(&fetched.items);
        println!(
            "Found {} trainers:",
            fetched.request.total_items.unwrap_or(fetched.items.len())
        );
        let first = fetched.request.offset() + 1;
        for (i, trainer) in view.items.iter().enumerate() {
            render_trainer(first + i, trainer);
        }
        render_controls(&view.controls);
    }

    Ok(())
}

fn validate_form(form: FormCommand) -> bool {
    let result = match form {
        FormCommand::Signup {
            first_name,
            last_name,
            email,
            phone,
            password,
            confirm_password,
        } => SignupForm {
            first_name,
            last_name,
            email,
            phone,
            password,
            confirm_password,
        }
        .validate(),
        FormCommand::Login { email, password } => LoginForm { email, password }.validate(),
        FormCommand::Company {
            company_name,
            website,
            contact_email,
            employee_count,
        } => CompanyRegistrationForm {
            company_name,
            website,
            contact_email,
            employee_count,
        }
        .validate(),
    };

    match result {
        Ok(()) => {
            println!("All fields are valid.");
            true
        }
        Err(errors) => {
            for error in &errors.errors {
                eprintln!("  {}: {}", error.field, error.message);
            }
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pages {
            total_items,
            page,
            page_size,
            delta,
        } => {
            let items: Vec<usize> = (1..=total_items).collect();
            let mut grid = GridAdapter::client(page_size).with_delta(delta);
            grid.on_page_change(&items, page);

            let view = grid.view(&items);
            let shown: Vec<String> = view.items.iter().map(|i| i.to_string()).collect();
            println!("Items: {}", shown.join(", "));
            if view.controls == Controls::None {
                println!("Everything fits on one page.");
            }
            render_controls(&view.controls);
        }
        Commands::Trainers {
            filter,
            page,
            client_side,
            preview,
        } => {
            if let Err(e) = list_trainers(filter.into(), page, client_side, preview).await {
                eprintln!("Listing trainers failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { form } => {
            if !validate_form(form) {
                std::process::exit(1);
            }
        }
        Commands::Credits { credits, order } => {
            let q = match quote(credits) {
                Ok(q) => q,
                Err(e) => {
                    eprintln!("Cannot quote: {}", e);
                    std::process::exit(1);
                }
            };

            match q.package {
                Some(package) => println!(
                    "{} package: {} credits for {}",
                    package.name,
                    package.credits,
                    format_inr(package.price_paise)
                ),
                None => println!("{} credits at the per-credit rate", q.credits_granted),
            }
            println!("Subtotal: {}", format_inr(q.subtotal_paise));
            println!("GST:      {}", format_inr(q.gst_paise));
            println!("Total:    {}", format_inr(q.total_paise));

            if order {
                let config = ClientConfig::load()?;
                let client = FrappeClient::new(&config)?;
                match client.create_credit_order(&q).await {
                    Ok(created) => {
                        println!("Order {} created.", created.order_id);
                        if let Some(url) = created.payment_url {
                            println!("Pay at: {}", url);
                        }
                    }
                    Err(e) => {
                        eprintln!("Order failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_ignores_requested_page() {
        assert_eq!(requested_page(3, true), 1);
        assert_eq!(requested_page(3, false), 3);
    }

    #[test]
    fn filter_args_map_onto_trainer_filter() {
        let cli = Cli::parse_from([
            "getpros-cli",
            "trainers",
            "--query",
            "sales",
            "--max-rate",
            "2000",
            "--preview",
            "--page",
            "4",
        ]);
        match cli.command {
            Commands::Trainers {
                filter,
                page,
                preview,
                ..
            } => {
                assert!(preview);
                assert_eq!(requested_page(page, preview), 1);
                let filter: TrainerFilter = filter.into();
                assert_eq!(filter.query.as_deref(), Some("sales"));
                assert_eq!(filter.max_hourly_rate, Some(2000.0));
            }
            _ => panic!("expected the trainers command"),
        }
    }
}
