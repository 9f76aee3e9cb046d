//! One run: read the input, place areas into banks, diagnose and render.

use crate::environment::{AreaSort, Options};
use crate::error::Result;
use crate::loader::{self, Format};
use crate::memory_map;
use crate::model::BankList;
use crate::render::Renderer;
use crate::report::{Diagnostics, ReportView};
use std::path::Path;
use tracing::{debug, trace};

const CDB_NOTICE: &str = "
   ************************ NOTICE ************************ 
    .cdb output ONLY counts (most) data from C sources.     
   It cannot count functions and data from ASM and LIBs.    
   Bank totals may be incorrect/missing. (-nB to hide this) 
   ************************ NOTICE ************************ ";

/// Everything a run produced, nothing has been printed yet.
#[derive(Debug)]
pub struct Outcome {
    format: Format,
    view: ReportView,
    report: String,
    diagnostics: Diagnostics,
}

impl Outcome {
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn view(&self) -> &ReportView {
        &self.view
    }

    /// The rendered report, including banners.
    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// True if the run must end with a failure exit code.
    pub fn failed(&self) -> bool {
        self.diagnostics.failed()
    }
}

/// Runs the whole pipeline on `input`.
///
/// Configuration and input errors are returned before any output is produced.
pub fn run(input: &Path, options: &Options) -> Result<Outcome> {
    memory_map::validate_registry()?;

    let manual_areas = options.manual_areas()?;
    let format = Format::from_path(input)?;
    debug!("reading {} as {} file", input.display(), format);

    let areas = loader::create_source(input)?.areas()?;

    let mut banks = BankList::new().with_all_exclusive(options.all_exclusive);
    for area in areas {
        trace!("ingesting {}", area);
        banks.ingest(area);
    }
    for manual in &manual_areas {
        debug!("adding manual area {}", manual);
        banks.ingest(manual.to_area());
    }

    let view = banks.finalize();
    let diagnostics = view.diagnose(options.error_on_warning);
    debug!(
        "{} banks, {} warnings",
        view.banks().len(),
        diagnostics.warnings().len()
    );

    let show_areas = options.display.area_sort != AreaSort::Hide
        && (options.display.show_areas || format.shows_areas_by_default());
    let table = Renderer::new(options)
        .with_show_areas(show_areas)
        .render(&view);

    let report = if format.undercounts() && !options.display.hide_banners {
        format!("{}\n\n{}{}\n", CDB_NOTICE, table, CDB_NOTICE)
    } else {
        table
    };

    Ok(Outcome {
        format,
        view,
        report,
        diagnostics,
    })
}
