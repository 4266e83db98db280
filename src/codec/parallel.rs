//! Parallel Huffman codec using a producer-consumer pipeline.
//!
//! Architecture:
//! - Main thread: read blocks from the input, send jobs
//! - Worker pool: encode or decode blocks independently
//! - Main thread: receive finished blocks, write them in input order
//!
//! The output is byte-for-byte what [`HuffmanCodec`] produces.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter, Read, Write};

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use super::huffman::HuffmanCodec;
use crate::error::{Corruption, Error, Result};
use crate::huffman::{encode_block, read_block, BlockFrame, EncodedBlock};
use crate::{Codec, CodecConfig, CodecStats};

/// A finished block, ready to be written
struct FinishedBlock {
    /// Bytes to write
    data: Vec<u8>,
    /// Bytes of input this block consumed
    input_len: usize,
    /// Set when decoding stopped inside this block
    corruption: Option<Corruption>,
}

/// Writes finished blocks in sequence order, buffering early arrivals
struct OrderedWriter<'a, W: Write> {
    writer: &'a mut W,
    pending: BTreeMap<u64, FinishedBlock>,
    next_write_id: u64,
    stats: CodecStats,
}

impl<'a, W: Write> OrderedWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self { writer, pending: BTreeMap::new(), next_write_id: 0, stats: CodecStats::default() }
    }

    fn accept(&mut self, block_id: u64, block: FinishedBlock) -> Result<()> {
        self.pending.insert(block_id, block);

        while let Some(block) = self.pending.remove(&self.next_write_id) {
            self.next_write_id += 1;
            // Nothing after the first corrupt block is written
            if self.stats.corruption.is_some() {
                continue;
            }
            self.writer.write_all(&block.data)?;
            self.stats.input_bytes += block.input_len as u64;
            self.stats.output_bytes += block.data.len() as u64;
            self.stats.blocks += 1;
            self.stats.corruption = block.corruption;
        }
        Ok(())
    }

    fn stopped(&self) -> bool {
        self.stats.corruption.is_some()
    }
}

/// Parallel Huffman codec
pub struct ParallelHuffmanCodec {
    config: CodecConfig,
}

impl ParallelHuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    fn effective_threads(&self) -> usize {
        match self.config.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        }
    }
}

impl Codec for ParallelHuffmanCodec {
    fn encode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats> {
        let num_threads = self.effective_threads();
        if num_threads == 1 {
            return HuffmanCodec::new(self.config.clone()).encode(input, output);
        }

        let block_size = self.config.effective_block_size();
        let mut reader = BufReader::with_capacity(self.config.buffer_size, input);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, output);
        let mut exhausted = false;

        let next_job = || -> Result<Option<Vec<u8>>> {
            if exhausted {
                return Ok(None);
            }
            let mut block = Vec::with_capacity(block_size.min(1 << 20));
            reader.by_ref().take(block_size as u64).read_to_end(&mut block)?;
            exhausted = block.len() < block_size;
            Ok((!block.is_empty()).then_some(block))
        };

        let stats = run_pipeline(num_threads, next_job, encode_job, &mut writer)?;
        writer.flush()?;
        Ok(stats)
    }

    fn decode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats> {
        let num_threads = self.effective_threads();
        if num_threads == 1 {
            return HuffmanCodec::new(self.config.clone()).decode(input, output);
        }

        let mut reader = BufReader::with_capacity(self.config.buffer_size, input);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, output);
        let mut frame_corruption = None;

        let next_job = || -> Result<Option<EncodedBlock>> {
            match read_block(&mut reader)? {
                BlockFrame::End => Ok(None),
                BlockFrame::Corrupt(corruption) => {
                    frame_corruption = Some(corruption);
                    Ok(None)
                }
                BlockFrame::Block(block) => Ok(Some(block)),
            }
        };

        let mut stats = run_pipeline(num_threads, next_job, decode_job, &mut writer)?;
        writer.flush()?;

        if stats.corruption.is_none() {
            if let Some(corruption) = frame_corruption {
                warn!(block = stats.blocks, %corruption, "unreadable Huffman block header");
                stats.corruption = Some(corruption);
            }
        }
        Ok(stats)
    }
}

fn encode_job(block: Vec<u8>) -> Result<FinishedBlock> {
    let encoded = encode_block(&block)?;
    Ok(FinishedBlock { data: encoded.to_bytes(), input_len: block.len(), corruption: None })
}

fn decode_job(block: EncodedBlock) -> Result<FinishedBlock> {
    let decoded = block.decode();
    Ok(FinishedBlock {
        data: decoded.data,
        input_len: block.encoded_len(),
        corruption: decoded.corruption,
    })
}

/// Fan jobs out to `num_threads` workers and write their results in order
fn run_pipeline<T, P, F, W>(
    num_threads: usize,
    next_job: P,
    work: F,
    writer: &mut W,
) -> Result<CodecStats>
where
    T: Send,
    P: FnMut() -> Result<Option<T>>,
    F: Fn(T) -> Result<FinishedBlock> + Sync,
    W: Write,
{
    // Enough to keep workers busy without excessive memory
    let channel_capacity = num_threads * 4;

    let (job_tx, job_rx): (Sender<(u64, T)>, Receiver<(u64, T)>) = bounded(channel_capacity);
    let (result_tx, result_rx): (
        Sender<(u64, Result<FinishedBlock>)>,
        Receiver<(u64, Result<FinishedBlock>)>,
    ) = bounded(channel_capacity);

    let work = &work;

    // Scoped threads avoid 'static lifetime requirements
    let result = crossbeam::scope(|scope| {
        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move |_| {
                worker_thread(job_rx, result_tx, work);
            });
        }

        // Drop our copies of the channels that workers use
        drop(job_rx);
        drop(result_tx);

        dispatch_and_write(next_job, writer, job_tx, result_rx)
    });

    result.map_err(|_| Error::Internal("Thread panicked".to_string()))?
}

fn dispatch_and_write<T, P, W>(
    mut next_job: P,
    writer: &mut W,
    job_tx: Sender<(u64, T)>,
    result_rx: Receiver<(u64, Result<FinishedBlock>)>,
) -> Result<CodecStats>
where
    P: FnMut() -> Result<Option<T>>,
    W: Write,
{
    let mut ordered = OrderedWriter::new(writer);
    let mut dispatched: u64 = 0;
    let mut received: u64 = 0;

    while !ordered.stopped() {
        let Some(payload) = next_job()? else {
            break;
        };

        let mut job = (dispatched, payload);
        loop {
            match job_tx.try_send(job) {
                Ok(()) => break,
                Err(TrySendError::Full(returned)) => {
                    // Queue full: wait for a worker to finish something
                    job = returned;
                    let (block_id, result) = result_rx
                        .recv()
                        .map_err(|_| Error::Internal("Result channel disconnected".to_string()))?;
                    received += 1;
                    ordered.accept(block_id, result?)?;
                }
                Err(TrySendError::Disconnected(_)) => {
                    return Err(Error::Internal("Workers disconnected".to_string()));
                }
            }
        }
        dispatched += 1;
    }

    // Signal workers we're done
    drop(job_tx);

    while received < dispatched {
        let (block_id, result) = result_rx
            .recv()
            .map_err(|_| Error::Internal("Result channel disconnected".to_string()))?;
        received += 1;
        ordered.accept(block_id, result?)?;
    }

    debug!(blocks = dispatched, "parallel Huffman pipeline drained");
    Ok(ordered.stats)
}

/// Worker thread: process jobs until the job channel closes
fn worker_thread<T, F>(
    job_rx: Receiver<(u64, T)>,
    result_tx: Sender<(u64, Result<FinishedBlock>)>,
    work: &F,
) where
    F: Fn(T) -> Result<FinishedBlock>,
{
    while let Ok((block_id, payload)) = job_rx.recv() {
        if result_tx.send((block_id, work(payload))).is_err() {
            // Main thread has stopped, exit
            break;
        }
    }
}
