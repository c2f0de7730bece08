//! embedded_hal I2C trait implementation for the MCP2221.
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use super::{Error, MAX_I2C_TRANSFER_PLUS_1, Mcp2221};

impl ErrorType for Mcp2221 {
    type Error = Error;
}

/// Split `operations` into a leading run of writes and a trailing run of
/// reads, either of which may be empty.
///
/// # Errors
///
/// [`Error::I2cUnsupportedTransaction`] if a write follows a read.
fn split_writes_reads<'a, 'b>(
    operations: &'a mut [Operation<'b>],
) -> Result<(&'a mut [Operation<'b>], &'a mut [Operation<'b>]), Error> {
    let first_read = operations
        .iter()
        .position(|op| matches!(op, Operation::Read(_)))
        .unwrap_or(operations.len());
    let (writes, reads) = operations.split_at_mut(first_read);
    if reads.iter().any(|op| matches!(op, Operation::Write(_))) {
        return Err(Error::I2cUnsupportedTransaction);
    }
    Ok((writes, reads))
}

fn total_length(ops: &[Operation<'_>]) -> Result<usize, Error> {
    let sum: usize = ops
        .iter()
        .map(|op| match op {
            Operation::Read(items) => items.len(),
            Operation::Write(items) => items.len(),
        })
        .sum();
    match sum {
        0 => Err(Error::I2cTransferEmpty),
        MAX_I2C_TRANSFER_PLUS_1.. => Err(Error::I2cTransferTooLong),
        sum => Ok(sum),
    }
}

impl I2c<SevenBitAddress> for Mcp2221 {
    /// Execute the provided operations on the I2C bus.
    ///
    /// <div class="warning">
    ///
    /// The MCP2221 has no HID command to read without a final STOP condition, so
    /// only a run of writes, a run of reads, or writes followed by reads are
    /// supported. Anything else returns [`Error::I2cUnsupportedTransaction`].
    ///
    /// </div>
    ///
    /// Writes are coalesced into one buffer and reads are collected into one
    /// buffer before being copied out, so the single-buffer methods should be
    /// preferred where possible.
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }
        let (writes, reads) = split_writes_reads(operations)?;

        // Check both lengths before anything goes on the bus.
        let write_length = if writes.is_empty() { None } else { Some(total_length(writes)?) };
        let read_length = if reads.is_empty() { None } else { Some(total_length(reads)?) };

        let mut write_data = Vec::with_capacity(write_length.unwrap_or(0));
        for op in writes.iter() {
            if let Operation::Write(buf) = op {
                write_data.extend_from_slice(buf);
            }
        }

        let Some(read_length) = read_length else {
            return self.i2c_write(address, &write_data);
        };
        let mut read_data = vec![0u8; read_length];
        if write_data.is_empty() {
            self.i2c_read(address, &mut read_data)?;
        } else {
            self.i2c_write_read(address, &write_data, &mut read_data)?;
        }

        let mut copied = 0;
        for op in reads.iter_mut() {
            if let Operation::Read(buf) = op {
                let end = copied + buf.len();
                buf.copy_from_slice(&read_data[copied..end]);
                copied = end;
            }
        }
        Ok(())
    }

    fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c_read(address, read)
    }

    fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        self.i2c_write(address, write)
    }

    fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c_write_read(address, write, read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_supported_shapes() {
        let (mut a, mut b) = ([0u8; 1], [0u8; 2]);
        let mut ops = [Operation::Write(&[0x00]), Operation::Write(&[0x01, 0x27])];
        let (writes, reads) = split_writes_reads(&mut ops).unwrap();
        assert_eq!((writes.len(), reads.len()), (2, 0));

        let mut ops = [Operation::Read(&mut a), Operation::Read(&mut b)];
        let (writes, reads) = split_writes_reads(&mut ops).unwrap();
        assert_eq!((writes.len(), reads.len()), (0, 2));

        let mut ops = [Operation::Write(&[0xFF]), Operation::Read(&mut b)];
        let (writes, reads) = split_writes_reads(&mut ops).unwrap();
        assert_eq!((writes.len(), reads.len()), (1, 1));
    }

    #[test]
    fn rejects_write_after_read() {
        let mut buf = [0u8; 2];
        let mut ops = [Operation::Read(&mut buf), Operation::Write(&[0x00])];
        assert!(matches!(
            split_writes_reads(&mut ops),
            Err(Error::I2cUnsupportedTransaction)
        ));

        let mut buf = [0u8; 2];
        let mut ops = [
            Operation::Write(&[0xFF]),
            Operation::Read(&mut buf),
            Operation::Write(&[0x00]),
        ];
        assert!(matches!(
            split_writes_reads(&mut ops),
            Err(Error::I2cUnsupportedTransaction)
        ));
    }

    #[test]
    fn total_length_bounds() {
        let mut buf = [0u8; 2];
        assert_eq!(
            total_length(&[Operation::Write(&[0x00]), Operation::Read(&mut buf)]).ok(),
            Some(3)
        );
        assert!(matches!(total_length(&[]), Err(Error::I2cTransferEmpty)));
        assert!(matches!(
            total_length(&[Operation::Write(&[])]),
            Err(Error::I2cTransferEmpty)
        ));
        let long = vec![0u8; MAX_I2C_TRANSFER_PLUS_1];
        assert!(matches!(
            total_length(&[Operation::Write(&long)]),
            Err(Error::I2cTransferTooLong)
        ));
    }
}
