use xerxes_memory::RegisterLayout;

use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_registers, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_registers(RegisterLayout::standard().iter(), format);
    Ok(SUCCESS)
}
