use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rxcalc_core::appointment::next_appointment;
use rxcalc_core::pediatric::liquid_dose;
use rxcalc_core::reference;
use rxcalc_core::renal::{self, BmiCategory, ScrUnit, Sex};
use rxcalc_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rxcalc")]
#[command(about = "Clinical dosing calculators for the anticoagulation clinic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a weekly warfarin pill regimen
    Regimen {
        /// Target weekly dose in mg (0.5 mg steps)
        #[arg(long)]
        dose: f64,

        /// Days until the next appointment
        #[arg(long)]
        days: Option<u32>,

        /// Tablet families to draw from, by base strength (e.g. 2,3)
        #[arg(long, value_delimiter = ',')]
        pills: Option<Vec<u32>>,

        /// First day the regimen covers; prints the refill date
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Titrate the weekly warfarin dose
    Titrate {
        /// Current weekly dose in mg
        #[arg(long)]
        current: f64,

        /// New target weekly dose in mg
        #[arg(long, conflicts_with = "percent")]
        target: Option<f64>,

        /// Adjust by a percentage step instead of an explicit target
        #[arg(long, allow_hyphen_values = true)]
        percent: Option<f64>,
    },

    /// Renal function and body-size calculations
    Renal {
        /// male or female
        #[arg(long)]
        sex: String,

        /// Age in years
        #[arg(long)]
        age: f64,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Actual body weight in kg
        #[arg(long)]
        weight: f64,

        /// Serum creatinine
        #[arg(long)]
        scr: f64,

        /// Creatinine unit: mg/dl or umol/l
        #[arg(long, default_value = "mg/dl")]
        scr_unit: String,
    },

    /// Pediatric liquid drug dose
    Pediatric {
        /// Child's weight in kg
        #[arg(long)]
        weight: f64,

        /// Daily dose in mg/kg/day
        #[arg(long)]
        dose_per_kg: f64,

        /// Doses per day
        #[arg(long, default_value_t = 1)]
        per_day: u32,

        /// Liquid concentration in mg/mL
        #[arg(long)]
        concentration: f64,
    },

    /// Compute the next appointment date
    Appointment {
        /// Date of the current visit; defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Days until the next visit
        #[arg(long)]
        days: Option<u32>,
    },

    /// Look up pregnancy and lactation guidance for a drug
    Lookup {
        /// Drug name (substring, case-insensitive)
        query: String,
    },

    /// List the stocked tablet strengths per family
    Pills,
}

fn main() -> Result<()> {
    // Initialize logging
    rxcalc_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Regimen {
            dose,
            days,
            pills,
            start,
            json,
        } => cmd_regimen(&config, dose, days, pills, start, json),
        Commands::Titrate {
            current,
            target,
            percent,
        } => cmd_titrate(&config, current, target, percent),
        Commands::Renal {
            sex,
            age,
            height,
            weight,
            scr,
            scr_unit,
        } => cmd_renal(&sex, age, height, weight, scr, &scr_unit),
        Commands::Pediatric {
            weight,
            dose_per_kg,
            per_day,
            concentration,
        } => cmd_pediatric(weight, dose_per_kg, per_day, concentration),
        Commands::Appointment { start, days } => cmd_appointment(&config, start, days),
        Commands::Lookup { query } => cmd_lookup(&config, &query),
        Commands::Pills => cmd_pills(),
    }
}

fn parse_selection(bases: &[u32]) -> Result<PillSelection> {
    let mut selection = PillSelection::none();
    for base in bases {
        match base {
            2 => selection.enable(PillFamily::Base2),
            3 => selection.enable(PillFamily::Base3),
            5 => selection.enable(PillFamily::Base5),
            other => {
                return Err(Error::InvalidInput(format!(
                    "unknown tablet family '{other}'; choose from 2, 3, 5"
                )))
            }
        }
    }
    Ok(selection)
}

fn cmd_regimen(
    config: &Config,
    dose: f64,
    days: Option<u32>,
    pills: Option<Vec<u32>>,
    start: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let selection = match pills {
        Some(bases) => parse_selection(&bases)?,
        None => config.pills.selection(),
    };
    let days = days.unwrap_or(config.dosing.default_appointment_days);

    if dose > 0.0
        && (dose < config.dosing.min_weekly_mg || dose > config.dosing.max_weekly_mg)
    {
        tracing::warn!(
            dose,
            "weekly dose is outside the usual {}-{} mg range",
            config.dosing.min_weekly_mg,
            config.dosing.max_weekly_mg
        );
    }

    let plan = plan_week(dose, &selection, days)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    display_plan(&plan, start);
    Ok(())
}

fn display_plan(plan: &RegimenPlan, start: Option<NaiveDate>) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WEEKLY WARFARIN REGIMEN");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Weekly target: {} mg", format_mg(plan.target_dose_mg));
    println!();

    for day in &plan.regimen.days {
        let pills = if day.pills.is_empty() {
            "—".to_string()
        } else {
            day.pills
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        println!(
            "  {:<10} {:>5} mg   {}",
            day.weekday.label(),
            format_mg(day.dose_mg),
            pills
        );
    }

    println!();
    if plan.summary.is_empty() {
        println!("  No tablets needed.");
    } else {
        let days = if plan.appointment_days == 0 {
            7
        } else {
            plan.appointment_days
        };
        println!("  Tablets for {} days:", days);
        // Largest base strength first, matching the paper summary sheet
        for (family, count) in plan.summary.tablets.iter().rev() {
            println!("    {} tablets: {}", family, count);
        }
    }

    if let Some(start) = start {
        let days = if plan.appointment_days == 0 {
            7
        } else {
            plan.appointment_days
        };
        println!();
        println!(
            "  Next appointment: {}",
            next_appointment(start, days as i64)
        );
    }
    println!();
}

fn cmd_titrate(
    config: &Config,
    current: f64,
    target: Option<f64>,
    percent: Option<f64>,
) -> Result<()> {
    let target = match (target, percent) {
        (Some(target), _) => target,
        (None, Some(percent)) => adjust_by_percent(current, percent, &config.dosing)?,
        (None, None) => {
            return Err(Error::InvalidInput(
                "provide --target or --percent".into(),
            ))
        }
    };

    let change = DoseChange::compute(current, target)?;
    let (icon, word) = match change.direction {
        DoseDirection::Increase => ("▲", "increase"),
        DoseDirection::Decrease => ("▼", "decrease"),
        DoseDirection::Unchanged => ("＝", "unchanged"),
    };

    println!("\n  Current weekly dose: {} mg", format_mg(change.current_mg));
    println!(
        "  New weekly dose:     {} mg  {} {} {:.2}%",
        format_mg(change.rounded_target_mg),
        icon,
        word,
        change.percent_change.abs()
    );
    println!();
    Ok(())
}

fn cmd_renal(
    sex: &str,
    age: f64,
    height: f64,
    weight: f64,
    scr: f64,
    scr_unit: &str,
) -> Result<()> {
    let sex: Sex = sex.parse()?;
    let unit: ScrUnit = scr_unit.parse()?;

    let ibw = renal::ideal_body_weight(sex, height)?;
    let pct_ibw = renal::percent_over_ibw(weight, ibw)?;
    let abw = renal::adjusted_body_weight(ibw, weight)?;
    let bmi = renal::bmi(weight, height)?;
    let bsa = renal::body_surface_area(height, weight)?;
    let crcl = renal::creatinine_clearance(sex, age, weight, scr, unit)?;

    println!("\n  Ideal body weight (IBW):    {:.2} kg", ibw);
    println!("  Actual weight vs IBW:       {:+.0}%", pct_ibw);
    println!("  Adjusted body weight:       {:.2} kg", abw);
    println!(
        "  Body mass index:            {:.2} ({})",
        bmi,
        BmiCategory::from_bmi(bmi).label()
    );
    println!("  Body surface area:          {:.3} m²", bsa);
    println!("  Creatinine clearance:       {:.2} mL/min", crcl);
    println!();
    Ok(())
}

fn cmd_pediatric(
    weight: f64,
    dose_per_kg: f64,
    per_day: u32,
    concentration: f64,
) -> Result<()> {
    let dose = liquid_dose(weight, dose_per_kg, per_day, concentration)?;

    println!(
        "\n  {:.1} mg per dose, {} time(s) a day",
        dose.mg_per_dose, dose.doses_per_day
    );
    println!("  Give {:.1} mL per dose", dose.ml_per_dose);
    println!();
    Ok(())
}

fn cmd_appointment(config: &Config, start: Option<NaiveDate>, days: Option<u32>) -> Result<()> {
    let start = start.unwrap_or_else(|| chrono::Local::now().date_naive());
    let days = days.unwrap_or(config.dosing.default_appointment_days);
    let next = next_appointment(start, days as i64);

    println!("\n  Visit date:        {}", start);
    println!(
        "  Next appointment:  {}  ({} days, {})",
        next,
        days,
        next.format("%A")
    );
    println!();
    Ok(())
}

fn cmd_lookup(config: &Config, query: &str) -> Result<()> {
    let site_table = match &config.reference.drug_file {
        Some(path) => load_drug_reference(path)?,
        None => None,
    };
    let entries: &[reference::DrugEntry] = match &site_table {
        Some(entries) => entries,
        None => builtin_reference(),
    };

    let hits = reference::find(entries, query);
    if hits.is_empty() {
        println!("\n  No drug matching '{}' in the reference table.\n", query);
        return Ok(());
    }

    for entry in hits {
        println!("\n╭─────────────────────────────────────────╮");
        println!("│  {}", entry.name);
        println!("╰─────────────────────────────────────────╯");
        println!();
        println!("  Pregnancy category {}", entry.pregnancy_category);
        println!("    {}", entry.pregnancy_info);
        println!("  Lactation category {}", entry.lactation_category);
        println!("    {}", entry.lactation_info);
        for reference in &entry.references {
            println!("  ℹ {}", reference);
        }
    }
    println!();
    Ok(())
}

fn cmd_pills() -> Result<()> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid tablet catalog".into()));
    }

    println!("\n  Stocked tablet strengths:");
    for family in PillFamily::ALL {
        println!("\n  {} family", family);
        for tablet in catalog.for_family(family) {
            println!(
                "    {:>5} mg  ({})",
                tablet.strength.to_string(),
                tablet.description()
            );
        }
    }
    println!();
    Ok(())
}
