use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};

use crate::models::{CpuSample, DeviceSample, ParsedData};
use crate::parser::columns::{CpuColumn, DeviceColumn, Header};
use crate::parser::lines::{Line, Lines};
use crate::parser::ParseError;

/// `MM/DD/YY HH:MM:SS`, the only timestamp layout that opens a block.
const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S";
const CPU_MARKER: &str = "avg-cpu:";

/// Parse a block timestamp line. The whole line must match, with every field
/// zero-padded to two digits.
pub fn parse_timestamp(line: &str) -> Option<NaiveDateTime> {
    let line = line.trim();
    if !has_timestamp_shape(line.as_bytes()) {
        return None;
    }
    NaiveDateTime::parse_from_str(line, TIMESTAMP_FORMAT).ok()
}

/// `DD/DD/DD DD:DD:DD`. chrono alone would also take `9/4/24 1:07:20`.
fn has_timestamp_shape(b: &[u8]) -> bool {
    const SHAPE: &[u8; 17] = b"00/00/00 00:00:00";
    b.len() == SHAPE.len()
        && b.iter().zip(SHAPE).all(|(&c, &s)| match s {
            b'0' => c.is_ascii_digit(),
            _    => c == s,
        })
}

/// Parse the complete output of `iostat -x -c` into CPU and device series.
///
/// Blocks that never reach their CPU values or device table are dropped with a
/// warning. A non-numeric value anywhere a number is expected fails the whole
/// parse.
pub fn parse_iostat(data: &[u8]) -> Result<ParsedData, ParseError> {
    let mut parser = IostatParser::new();
    for line in Lines::new(data) {
        parser.feed(&line)?;
    }
    Ok(parser.finish())
}

/// Where the current block started.
#[derive(Debug, Clone, Copy)]
struct Block {
    timestamp: NaiveDateTime,
    line:      usize,
}

#[derive(Debug)]
enum State {
    SeekTimestamp,
    SeekCpuHeader    { block: Block },
    SeekCpuValues    { block: Block, header: Header<CpuColumn> },
    SeekDeviceHeader { block: Block },
    DeviceRows       { block: Block, header: Header<DeviceColumn> },
}

struct IostatParser {
    state: State,
    out:   ParsedData,
}

impl IostatParser {
    fn new() -> Self {
        Self { state: State::SeekTimestamp, out: ParsedData::new() }
    }

    fn feed(&mut self, line: &Line) -> Result<(), ParseError> {
        let state = std::mem::replace(&mut self.state, State::SeekTimestamp);
        self.state = match state {
            State::SeekTimestamp                    => self.seek_timestamp(line),
            State::SeekCpuHeader { block }          => self.seek_cpu_header(block, line),
            State::SeekCpuValues { block, header }  => self.seek_cpu_values(block, header, line)?,
            State::SeekDeviceHeader { block }       => self.seek_device_header(block, line),
            State::DeviceRows { block, header }     => self.device_rows(block, header, line)?,
        };
        Ok(())
    }

    fn seek_timestamp(&mut self, line: &Line) -> State {
        if line.is_blank() {
            return State::SeekTimestamp;
        }
        match parse_timestamp(&line.text) {
            Some(timestamp) => State::SeekCpuHeader {
                block: Block { timestamp, line: line.number },
            },
            None => {
                trace!(line = line.number, "skipping non-block line");
                State::SeekTimestamp
            }
        }
    }

    fn seek_cpu_header(&mut self, block: Block, line: &Line) -> State {
        if let Some(rest) = line.text.strip_prefix(CPU_MARKER) {
            let header = Header::new(rest.split_whitespace(), CpuColumn::from_header);
            return State::SeekCpuValues { block, header };
        }
        if let Some(next) = self.restart(block, line, "avg-cpu header") {
            return next;
        }
        State::SeekCpuHeader { block }
    }

    fn seek_cpu_values(
        &mut self,
        block: Block,
        header: Header<CpuColumn>,
        line: &Line,
    ) -> Result<State, ParseError> {
        if line.is_blank() {
            return Ok(State::SeekCpuValues { block, header });
        }
        let mut cpu = CpuSample {
            timestamp: block.timestamp,
            user:      0.0,
            nice:      0.0,
            system:    0.0,
            iowait:    0.0,
            steal:     0.0,
            idle:      0.0,
        };
        header.read_row(&line.tokens(), line.number, |col, v| col.apply(&mut cpu, v))?;
        self.out.cpus.push(cpu);
        Ok(State::SeekDeviceHeader { block })
    }

    fn seek_device_header(&mut self, block: Block, line: &Line) -> State {
        if line.is_blank() {
            return State::SeekDeviceHeader { block };
        }
        let tokens = line.tokens();
        if matches!(tokens.first(), Some(&"Device") | Some(&"Device:")) {
            let header = Header::new(tokens[1..].iter().copied(), DeviceColumn::from_header);
            return State::DeviceRows { block, header };
        }
        if let Some(next) = self.restart(block, line, "device table") {
            return next;
        }
        State::SeekDeviceHeader { block }
    }

    fn device_rows(
        &mut self,
        block: Block,
        header: Header<DeviceColumn>,
        line: &Line,
    ) -> Result<State, ParseError> {
        if line.is_blank() {
            return Ok(State::SeekTimestamp);
        }
        if let Some(timestamp) = parse_timestamp(&line.text) {
            // No blank line after the table: treat the stamp as the next block.
            warn!(
                line = line.number,
                block_line = block.line,
                "timestamp inside device table; starting a new block"
            );
            return Ok(State::SeekCpuHeader {
                block: Block { timestamp, line: line.number },
            });
        }
        let tokens = line.tokens();
        let mut dev = DeviceSample::new(block.timestamp, tokens[0]);
        header.read_row(&tokens[1..], line.number, |col, v| col.apply(&mut dev, v))?;
        self.out.devices.push(dev);
        Ok(State::DeviceRows { block, header })
    }

    /// A timestamp met before the block was complete abandons it for a new one.
    fn restart(&self, block: Block, line: &Line, missing: &str) -> Option<State> {
        let timestamp = parse_timestamp(&line.text)?;
        warn!(
            block_line = block.line,
            line = line.number,
            "block has no {missing} before the next timestamp; dropping its remainder"
        );
        Some(State::SeekCpuHeader {
            block: Block { timestamp, line: line.number },
        })
    }

    fn finish(self) -> ParsedData {
        match &self.state {
            State::SeekTimestamp | State::DeviceRows { .. } => {}
            State::SeekCpuHeader { block } | State::SeekCpuValues { block, .. } => {
                warn!(block_line = block.line, "input ends before the block's CPU values");
            }
            State::SeekDeviceHeader { block } => {
                warn!(block_line = block.line, "input ends before the block's device table");
            }
        }
        debug!(
            cpu_samples = self.out.cpus.len(),
            devices = self.out.devices.len(),
            device_samples = self.out.device_sample_count(),
            names = ?self.out.devices.names().collect::<Vec<_>>(),
            "parsed iostat output"
        );
        self.out
    }
}
