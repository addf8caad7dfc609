//! 청크 단위 라인 리더 -- 대용량 입력의 메모리 상한 제어
//!
//! [`ChunkedReader`]는 입력을 고정 크기 라인 청크로 읽어
//! 전체 파일을 메모리에 올리지 않고 분석할 수 있게 합니다.
//!
//! - `.gz` 확장자 파일은 같은 읽기 루프 안에서 투명하게 해제됩니다.
//! - 라인 단위 디코딩 실패는 손실 대체(lossy replacement)로 처리되며
//!   치명적 에러가 되지 않습니다.
//! - `max_lines` 상한은 청크 경계를 넘어 전체 처리량을 절단합니다.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

/// 청크 단위 라인 리더
///
/// 내부 리더에서 라인을 읽어 `chunk_size`개씩 묶어 반환합니다.
pub struct ChunkedReader {
    inner: Box<dyn BufRead>,
    chunk_size: usize,
    max_lines: Option<u64>,
    lines_read: u64,
}

impl ChunkedReader {
    /// 파일에서 리더를 생성합니다.
    ///
    /// 경로가 `.gz`로 끝나면 gzip 해제 스트림을 사용합니다.
    pub fn open(
        path: impl AsRef<Path>,
        chunk_size: usize,
        max_lines: Option<u64>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let inner: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self {
            inner,
            chunk_size,
            max_lines,
            lines_read: 0,
        })
    }

    /// 임의의 리더에서 생성합니다.
    pub fn from_reader(
        reader: impl Read + 'static,
        chunk_size: usize,
        max_lines: Option<u64>,
    ) -> Self {
        Self {
            inner: Box::new(BufReader::new(reader)),
            chunk_size,
            max_lines,
            lines_read: 0,
        }
    }

    /// 지금까지 읽은 라인 수를 반환합니다.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// 다음 청크를 읽습니다.
    ///
    /// 빈 Vec은 입력의 끝 (또는 `max_lines` 도달)을 의미합니다.
    /// 라인 끝의 `\n`/`\r`은 제거되며, 유효하지 않은 UTF-8은
    /// 손실 대체 문자로 디코딩됩니다.
    pub fn next_chunk(&mut self) -> std::io::Result<Vec<String>> {
        let mut chunk = Vec::new();
        let mut buf = Vec::new();

        while chunk.len() < self.chunk_size {
            if self.max_lines.is_some_and(|max| self.lines_read >= max) {
                break;
            }

            buf.clear();
            let read = self.inner.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            chunk.push(line.trim_end_matches(['\n', '\r']).to_owned());
            self.lines_read += 1;
        }

        Ok(chunk)
    }
}
