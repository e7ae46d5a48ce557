//! 1文字だけ押し戻せる文字ソース

use std::io::{BufReader, Bytes, Read};

use utf8_decode::UnsafeDecoder;

use crate::error::{LexError, LexResult};

/// UTF-8 のバイト列から1文字ずつ取り出す読み込み器
///
/// 直前に読んだ1文字だけを押し戻すことができる。
/// 下層のストリームが終端を報告した後は、二度と読み込みを行わない。
pub struct CharSource<R: Read> {
    decoder: UnsafeDecoder<Bytes<BufReader<R>>>,
    /// 直前に読んだ文字（押し戻し可能なもの）
    last: Option<char>,
    /// 押し戻された文字
    pending: Option<char>,
    /// 読み込み位置のバイトオフセット
    offset: usize,
    exhausted: bool,
}

impl<R: Read> CharSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            decoder: UnsafeDecoder::new(BufReader::new(reader).bytes()),
            last: None,
            pending: None,
            offset: 0,
            exhausted: false,
        }
    }

    /// 次の1文字を読む。終端では `Ok(None)`。
    pub fn read_next(&mut self) -> LexResult<Option<char>> {
        if let Some(ch) = self.pending.take() {
            self.offset += ch.len_utf8();
            self.last = Some(ch);
            return Ok(Some(ch));
        }

        self.last = None;
        if self.exhausted {
            return Ok(None);
        }

        match self.decoder.next() {
            Some(Ok(ch)) => {
                self.offset += ch.len_utf8();
                self.last = Some(ch);
                Ok(Some(ch))
            }
            Some(Err(e)) => Err(LexError::Read(e)),
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    /// 直前に読んだ文字を押し戻す
    pub fn push_back(&mut self) -> LexResult<()> {
        let ch = self.last.take().ok_or(LexError::PushbackUnavailable)?;
        self.offset -= ch.len_utf8();
        self.pending = Some(ch);
        Ok(())
    }

    /// 現在のバイトオフセット
    pub fn offset(&self) -> usize {
        self.offset
    }
}
