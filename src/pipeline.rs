//! Running the products a configuration file asks for.

use tracing::{info, info_span};

use crate::accumulate::accumulate_daily;
use crate::config::HydatConfig;
use crate::convert::{
    Product, build_input_locator, build_monthly_spec, build_output_locator, build_process_config,
    build_water_input, parse_product,
};
use crate::error::HydatError;
use crate::locator::{InputLocator, PatternLocator};
use crate::monthly::aggregate_monthly;
use crate::options::{MonthlySpec, ProcessConfig, WaterInputConfig};
use crate::run::{RunSummary, check_distinct_outputs};
use crate::water_input::monthly_water_input;

enum Job {
    Accumulation {
        process: ProcessConfig,
        input: InputLocator,
        output: PatternLocator,
    },
    Monthly {
        process: ProcessConfig,
        spec: MonthlySpec,
        input: InputLocator,
        output: PatternLocator,
    },
    WaterInput {
        config: WaterInputConfig,
        precip: PatternLocator,
        swe_change: PatternLocator,
        output: PatternLocator,
    },
}

fn plan(cfg: &HydatConfig, product: Product) -> Result<Job, HydatError> {
    let job = match product {
        Product::Accumulation => Job::Accumulation {
            process: build_process_config(cfg)?,
            input: build_input_locator(cfg)?,
            output: build_output_locator(cfg, product.as_str()),
        },
        Product::Monthly => {
            let spec = build_monthly_spec(cfg)?;
            let output = build_output_locator(cfg, spec.output_name());
            Job::Monthly {
                process: build_process_config(cfg)?,
                spec,
                input: build_input_locator(cfg)?,
                output,
            }
        }
        Product::WaterInput => {
            let (config, precip, swe_change) = build_water_input(cfg)?;
            let output = build_output_locator(cfg, config.output_name());
            Job::WaterInput {
                config,
                precip,
                swe_change,
                output,
            }
        }
    };
    let output = match &job {
        Job::Accumulation { output, .. }
        | Job::Monthly { output, .. }
        | Job::WaterInput { output, .. } => output,
    };
    check_distinct_outputs(output, cfg.run.year_start, cfg.run.year_end)?;
    Ok(job)
}

/// Runs every product listed in `[run].products`, in order.
///
/// All products are configured and validated before the first year of the
/// first product is processed, so a typo in a later section fails fast.
///
/// # Errors
///
/// Returns the first configuration error, or the first product error in
/// strict mode.
pub fn run_configured(cfg: &HydatConfig) -> Result<Vec<(Product, RunSummary)>, HydatError> {
    if cfg.run.products.is_empty() {
        return Err(HydatError::configuration("no products requested"));
    }
    let jobs = cfg
        .run
        .products
        .iter()
        .map(|name| {
            let product = parse_product(name)?;
            Ok((product, plan(cfg, product)?))
        })
        .collect::<Result<Vec<_>, HydatError>>()?;

    let (year_start, year_end) = (cfg.run.year_start, cfg.run.year_end);
    let mut results = Vec::with_capacity(jobs.len());
    for (product, job) in jobs {
        let _product = info_span!("product", name = product.as_str()).entered();
        let summary = match job {
            Job::Accumulation {
                process,
                input,
                output,
            } => accumulate_daily(&process, year_start, year_end, &input, &output)?,
            Job::Monthly {
                process,
                spec,
                input,
                output,
            } => aggregate_monthly(&process, &spec, year_start, year_end, &input, &output)?,
            Job::WaterInput {
                config,
                precip,
                swe_change,
                output,
            } => monthly_water_input(&config, year_start, year_end, &precip, &swe_change, &output)?,
        };
        info!(
            n_written = summary.outputs().len(),
            n_skipped = summary.failures().len(),
            "product finished"
        );
        results.push((product, summary));
    }
    Ok(results)
}
